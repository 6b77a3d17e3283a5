use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A wrapper for operator-identifying data (license plates) that masks its
/// value in Debug/Display output while still serializing the real value.
#[derive(Clone, Deserialize)]
pub struct Masked<T>(pub T);

impl<T: fmt::Display> Masked<T> {
    fn masked(&self) -> String {
        let raw = self.0.to_string();
        let chars: Vec<char> = raw.chars().collect();
        // Keep the last three characters so an attendant can still match a
        // log line against a physical plate.
        let tail: String = chars[chars.len().saturating_sub(3)..].iter().collect();
        format!("***{}", tail)
    }
}

impl<T: fmt::Display> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl<T: fmt::Display> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Receipts and settlement exports need the real plate; the masking
        // only guards log macros like tracing::info!("{:?}", event).
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn into_inner(self) -> T {
        self.0
    }

    pub fn as_inner(&self) -> &T {
        &self.0
    }
}

impl<T> From<T> for Masked<T> {
    fn from(value: T) -> Self {
        Masked(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_output_is_masked() {
        let plate = Masked("KA-01-HH-1234".to_string());
        assert_eq!(format!("{:?}", plate), "***234");
        assert_eq!(format!("{}", plate), "***234");
    }

    #[test]
    fn test_short_values_stay_masked() {
        let plate = Masked("XY".to_string());
        assert_eq!(format!("{:?}", plate), "***XY");
    }

    #[test]
    fn test_serialization_keeps_real_value() {
        let plate = Masked("KA-01-HH-1234".to_string());
        let json = serde_json::to_string(&plate).unwrap();
        assert_eq!(json, "\"KA-01-HH-1234\"");
    }

    #[test]
    fn test_into_inner_returns_real_value() {
        let plate = Masked("AB-77".to_string());
        assert_eq!(plate.as_inner(), "AB-77");
        assert_eq!(plate.into_inner(), "AB-77");
    }
}
