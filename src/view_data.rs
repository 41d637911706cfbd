use crate::error::FetchError;

/// Category label → non-negative value, as returned by the stats endpoint.
///
/// Entries keep payload order for display; equality ignores it.
#[derive(Debug, Clone, Default)]
pub struct ViewData {
    entries: Vec<(String, f64)>,
}

impl ViewData {
    pub fn from_entries<I, S>(entries: I) -> Result<Self, FetchError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut out: Vec<(String, f64)> = Vec::new();
        for (label, value) in entries {
            let label = label.into();
            if !value.is_finite() || value < 0.0 {
                return Err(FetchError::Malformed(format!(
                    "value for {label:?} must be a non-negative number, got {value}"
                )));
            }
            if out.iter().any(|(l, _)| *l == label) {
                return Err(FetchError::Malformed(format!("duplicate category {label:?}")));
            }
            out.push((label, value));
        }
        Ok(Self { entries: out })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), *v))
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(l, _)| l.clone()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }
}

impl PartialEq for ViewData {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(label, value)| other.get(label) == Some(*value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_order() {
        let a = ViewData::from_entries([("Azir", 12.0), ("Ahri", 7.0)]).unwrap();
        let b = ViewData::from_entries([("Ahri", 7.0), ("Azir", 12.0)]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.labels(), vec!["Azir".to_string(), "Ahri".to_string()]);
    }

    #[test]
    fn rejects_negative_and_duplicate() {
        assert!(matches!(
            ViewData::from_entries([("Azir", -1.0)]),
            Err(FetchError::Malformed(_))
        ));
        assert!(matches!(
            ViewData::from_entries([("Azir", 1.0), ("Azir", 2.0)]),
            Err(FetchError::Malformed(_))
        ));
    }
}
