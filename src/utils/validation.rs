//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

use crate::utils::errors::{AppError, AppResult};

lazy_static! {
    /// CIF (letra + 7 dígitos + control) o NIF/NIE (8 dígitos + letra, X/Y/Z inicial)
    pub static ref TAX_ID_REGEX: Regex = Regex::new(r"^[A-Z0-9][0-9]{7}[A-Z0-9]$").unwrap();
}

/// Validar formato de CIF/NIF (ya normalizado en mayúsculas)
pub fn is_valid_tax_id(value: &str) -> bool {
    TAX_ID_REGEX.is_match(value)
}

/// Validar que el rango de fechas (inclusivo) esté ordenado
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> AppResult<()> {
    if end < start {
        return Err(AppError::BadRequest(format!(
            "La fecha de fin ({}) es anterior a la de inicio ({})",
            end, start
        )));
    }
    Ok(())
}

/// Validar que una cantidad sea estrictamente positiva
pub fn validate_positive_quantity(quantity: Decimal) -> AppResult<()> {
    if quantity <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "La cantidad debe ser mayor que cero".to_string(),
        ));
    }
    Ok(())
}

/// Interpretar un indicador booleano escrito a mano (CSV, formularios)
pub fn parse_bool_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "" => None,
        "true" | "1" | "si" | "sí" | "s" | "yes" | "y" | "activo" => Some(true),
        "false" | "0" | "no" | "n" | "inactivo" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_id() {
        assert!(is_valid_tax_id("B12345678"));
        assert!(is_valid_tax_id("12345678Z"));
        assert!(is_valid_tax_id("X1234567L"));
        assert!(!is_valid_tax_id("b12345678"));
        assert!(!is_valid_tax_id("B1234567"));
        assert!(!is_valid_tax_id(""));
    }

    #[test]
    fn test_date_range() {
        let d = |day| NaiveDate::from_ymd_opt(2026, 8, day).unwrap();
        assert!(validate_date_range(d(1), d(15)).is_ok());
        assert!(validate_date_range(d(3), d(3)).is_ok());
        assert!(validate_date_range(d(15), d(1)).is_err());
    }

    #[test]
    fn test_bool_flag() {
        assert_eq!(parse_bool_flag("Sí"), Some(true));
        assert_eq!(parse_bool_flag("0"), Some(false));
        assert_eq!(parse_bool_flag(""), None);
        assert_eq!(parse_bool_flag("quizá"), None);
    }
}
