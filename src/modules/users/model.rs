use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// One registrant. Verification and reset token state lives on the row
/// itself: reissuing a token overwrites the previous one, and consumption
/// clears both the token and its expiry together.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile_image_url: Option<String>,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub is_active: bool,
    pub verification_token: Option<String>,
    pub verification_expires: Option<DateTime<Utc>>,
    pub password_reset_token: Option<String>,
    pub password_reset_expires: Option<DateTime<Utc>>,
    pub verified_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Body-mass index, weight_kg / (height_m)^2, rounded to 2 decimals.
    /// None when either measurement is missing.
    pub fn bmi(&self) -> Option<f64> {
        let weight = self.weight_kg?;
        let height_m = self.height_cm? / 100.0;
        if height_m <= 0.0 {
            return None;
        }
        Some((weight / (height_m * height_m) * 100.0).round() / 100.0)
    }

    /// BMI band label for display.
    pub fn weight_status(&self) -> Option<&'static str> {
        let bmi = self.bmi()?;
        Some(if bmi < 18.5 {
            "underweight"
        } else if bmi < 25.0 {
            "normal weight"
        } else if bmi < 30.0 {
            "overweight"
        } else {
            "obesity"
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account_with(weight_kg: Option<f64>, height_cm: Option<f64>) -> Account {
        let now = Utc::now();
        Account {
            id: "test-id".to_string(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            password_hash: String::new(),
            profile_image_url: None,
            age: None,
            weight_kg,
            height_cm,
            is_active: true,
            verification_token: None,
            verification_expires: None,
            password_reset_token: None,
            password_reset_expires: None,
            verified_at: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_bmi_reference_value() {
        let account = account_with(Some(70.0), Some(175.0));
        assert_eq!(account.bmi(), Some(22.86));
        assert_eq!(account.weight_status(), Some("normal weight"));
    }

    #[test]
    fn test_bmi_bands() {
        assert_eq!(
            account_with(Some(50.0), Some(175.0)).weight_status(),
            Some("underweight")
        );
        assert_eq!(
            account_with(Some(80.0), Some(175.0)).weight_status(),
            Some("overweight")
        );
        assert_eq!(
            account_with(Some(95.0), Some(175.0)).weight_status(),
            Some("obesity")
        );
    }

    #[test]
    fn test_bmi_missing_measurements() {
        assert_eq!(account_with(None, Some(175.0)).bmi(), None);
        assert_eq!(account_with(Some(70.0), None).bmi(), None);
        assert_eq!(account_with(Some(70.0), None).weight_status(), None);
    }
}
