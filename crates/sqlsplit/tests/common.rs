#![allow(missing_docs, dead_code)]
#![expect(clippy::needless_raw_string_hashes)]

/// A trimmed-down `mysqldump` output: version comments, a trigger under
/// `DELIMITER ;;`, a procedure under `DELIMITER $$`, and a transaction.
pub const DUMP: &str = r#"-- MySQL dump 10.13
--
-- Host: localhost    Database: shop

/*!40101 SET NAMES utf8mb4 */;
DROP TABLE IF EXISTS `orders`;
CREATE TABLE `orders` (
  `id` int NOT NULL,
  `note` varchar(20) DEFAULT 'a;b',
  PRIMARY KEY (`id`)
);
INSERT INTO `orders` VALUES (1,'x'),(2,'it''s');
DELIMITER ;;
/*!50003 CREATE*/ /*!50003 TRIGGER `trg` BEFORE INSERT ON `orders` FOR EACH ROW BEGIN
  IF NEW.id < 0 THEN SET NEW.id = 0; END IF;
END */;;
DELIMITER ;
DELIMITER $$
CREATE PROCEDURE add_order(IN n INT)
BEGIN
  INSERT INTO orders (id) VALUES (n);
END$$
DELIMITER ;
BEGIN;
UPDATE orders SET note = 'done' WHERE id = 1;
COMMIT;
-- Dump completed
"#;

/// A stored function kept whole by block tracking alone.
pub const FUNCTION: &str = r#"CREATE FUNCTION grade(score INT) RETURNS CHAR(1) DETERMINISTIC
BEGIN
  DECLARE g CHAR(1);
  CASE
    WHEN score >= 90 THEN SET g = 'A';
    ELSE SET g = 'B';
  END CASE;
  WHILE score > 100 DO
    SET score = score - 1;
  END WHILE;
  RETURN g;
END;
SELECT grade(95);
"#;
