// src/services/share_link.rs

use url::Url;

use crate::common::{error::AppError, validation::field_error};

const WHATSAPP_BASE: &str = "https://wa.me";

/// Message sent along with a quote.
pub fn quote_message(client: &str, number: &str) -> String {
    format!("Hola {client},\n\nAdjunto la cotización {number}.\n\nSaludos.")
}

/// `https://wa.me/<digits>?text=<message>`. Only the digits of `phone` are kept.
pub fn whatsapp_link(phone: &str, message: &str) -> Result<String, AppError> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(field_error("phone", "blank", "must contain a phone number").into());
    }

    let url = Url::parse_with_params(&format!("{WHATSAPP_BASE}/{digits}"), &[("text", message)])
        .map_err(|e| AppError::InternalServerError(e.into()))?;
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_phone_digits_and_encodes_the_message() {
        let link = whatsapp_link("+51 987-654-321", &quote_message("Acme", "0001")).unwrap();
        assert!(link.starts_with("https://wa.me/51987654321?text="));

        let parsed = Url::parse(&link).unwrap();
        let (_, text) = parsed.query_pairs().find(|(k, _)| k == "text").unwrap();
        assert_eq!(text, "Hola Acme,\n\nAdjunto la cotización 0001.\n\nSaludos.");
    }

    #[test]
    fn phone_without_digits_is_rejected() {
        assert!(matches!(
            whatsapp_link(" + ", "hola"),
            Err(AppError::ValidationError(_))
        ));
    }
}
