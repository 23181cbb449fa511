//! Parser tests against realistic `mysqldump` style input.

mod common;
use common::*;

const DUMP: &str = r"-- MySQL dump 10.13  Distrib 8.0.36, for Linux (x86_64)
--
-- Host: localhost    Database: shop
-- ------------------------------------------------------

/*!40101 SET @OLD_CHARACTER_SET_CLIENT=@@CHARACTER_SET_CLIENT */;
/*!40101 SET NAMES utf8mb4 */;
/*!40014 SET @OLD_FOREIGN_KEY_CHECKS=@@FOREIGN_KEY_CHECKS, FOREIGN_KEY_CHECKS=0 */;

--
-- Table structure for table `customers`
--

DROP TABLE IF EXISTS `customers`;
/*!40101 SET @saved_cs_client     = @@character_set_client */;
/*!50503 SET character_set_client = utf8mb4 */;
CREATE TABLE `customers` (
  `id` int unsigned NOT NULL AUTO_INCREMENT,
  `email` varchar(191) COLLATE utf8mb4_unicode_ci NOT NULL,
  `note` text COMMENT 'free text, may contain ; and )',
  `created_at` timestamp NULL DEFAULT CURRENT_TIMESTAMP,
  PRIMARY KEY (`id`),
  UNIQUE KEY `uk_email` (`email`)
) ENGINE=InnoDB AUTO_INCREMENT=42 DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;
/*!40101 SET character_set_client = @saved_cs_client */;

--
-- Dumping data for table `customers`
--

LOCK TABLES `customers` WRITE;
INSERT INTO `customers` VALUES (1,'a@example.com','hello; world','2024-01-01 00:00:00');
UNLOCK TABLES;

# Hash comments are accepted too
CREATE TABLE IF NOT EXISTS `shop`.`invoices` (
  `id` bigint NOT NULL,
  `customer_id` int unsigned NOT NULL,
  `amount` decimal(12,2) NOT NULL DEFAULT '0.00',
  `kind` enum('one-off','recurring') NOT NULL,
  CONSTRAINT `fk_customer` FOREIGN KEY (`customer_id`) REFERENCES `customers` (`id`) ON DELETE CASCADE,
  KEY `idx_customer` (`customer_id`)
);
";

#[test]
fn dump_tables_in_source_order() {
    let schema = schema(DUMP);
    let names: Vec<&str> = schema.tables().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["customers", "invoices"]);
}

#[test]
fn dump_columns_exclude_keys_and_constraints() {
    let schema = schema(DUMP);
    let customers: Vec<&str> = schema.table("customers").unwrap().column_names().collect();
    assert_eq!(customers, vec!["id", "email", "note", "created_at"]);
    let invoices: Vec<&str> = schema.table("invoices").unwrap().column_names().collect();
    assert_eq!(invoices, vec!["id", "customer_id", "amount", "kind"]);
}

#[test]
fn dump_definitions_are_verbatim() {
    let schema = schema(DUMP);
    let customers = schema.table("customers").unwrap();
    assert_eq!(
        customers.column("note").unwrap().definition,
        "`note` text COMMENT 'free text, may contain ; and )'"
    );
    assert!(customers.create_statement.starts_with("CREATE TABLE `customers` ("));
    assert!(customers.create_statement.ends_with("COLLATE=utf8mb4_unicode_ci"));
    assert_eq!(
        schema.table("invoices").unwrap().column("kind").unwrap().definition,
        "`kind` enum('one-off','recurring') NOT NULL"
    );
}

#[test]
fn dump_executable_comments_stay_in_definitions() {
    let ddl = "CREATE TABLE `events` (
  `id` bigint NOT NULL,
  `trace` varchar(64) DEFAULT NULL /*!80023 INVISIBLE */,
  PRIMARY KEY (`id`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
/*!50100 PARTITION BY HASH (`id`)
PARTITIONS 4 */;";
    let schema = schema(ddl);
    let events = schema.table("events").unwrap();
    assert_eq!(
        events.column("trace").unwrap().definition,
        "`trace` varchar(64) DEFAULT NULL /*!80023 INVISIBLE */"
    );
    assert!(events.create_statement.ends_with("PARTITIONS 4 */"));
}

#[test]
fn error_unterminated_column_list() {
    let err = parse_err("CREATE TABLE t (\n  `id` INT,\n  `name` VARCHAR(10)\n");
    assert_eq!(err.message, "Unterminated parenthesis");
}

#[test]
fn error_unterminated_quote() {
    let err = parse_err("CREATE TABLE t (`id` INT COMMENT 'oops);");
    assert_eq!(err.message, "Unterminated string literal");
}

#[test]
fn error_unterminated_identifier() {
    let err = parse_err("CREATE TABLE `t (`id` INT);");
    assert!(err.message.starts_with("Unterminated"));
}

#[test]
fn error_without_create_table() {
    let err = parse_err("-- nothing here\nSET NAMES utf8mb4;\n");
    assert!(err.to_string().starts_with("No CREATE TABLE statement found"));
}

#[test]
fn error_reports_statement_fragment() {
    let err = parse_err("CREATE TABLE good (`id` INT);\nCREATE TABLE bad (`id` INT, , `x` INT);");
    assert_eq!(err.message, "Empty column definition");
    assert!(err.fragment.unwrap().starts_with("CREATE TABLE bad"));
}
