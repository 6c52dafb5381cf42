use crate::shared::constants::{MAX_LOTTO_NUMBER, MIN_LOTTO_NUMBER, NUMBERS_PER_SELECTION};

/// Six distinct lottery numbers, kept in the order they were chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedNumbers(Vec<u8>);

impl SelectedNumbers {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn to_stored(&self) -> String {
        self.0
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl TryFrom<Vec<i64>> for SelectedNumbers {
    type Error = String;

    fn try_from(value: Vec<i64>) -> Result<Self, Self::Error> {
        SelectedNumbers::try_from(value.as_slice())
    }
}

impl TryFrom<&[i64]> for SelectedNumbers {
    type Error = String;

    fn try_from(value: &[i64]) -> Result<Self, Self::Error> {
        if value.len() != NUMBERS_PER_SELECTION {
            return Err(format!(
                "exactly {} numbers are required, but {} were given.",
                NUMBERS_PER_SELECTION,
                value.len()
            ));
        }

        let mut numbers = Vec::with_capacity(NUMBERS_PER_SELECTION);
        for n in value.iter().copied() {
            let number = u8::try_from(n)
                .ok()
                .filter(|n| (MIN_LOTTO_NUMBER..=MAX_LOTTO_NUMBER).contains(n))
                .ok_or_else(|| {
                    format!(
                        "{} is not between {} and {}.",
                        n, MIN_LOTTO_NUMBER, MAX_LOTTO_NUMBER
                    )
                })?;
            if numbers.contains(&number) {
                return Err(format!("{} was chosen more than once.", number));
            }
            numbers.push(number);
        }

        Ok(SelectedNumbers(numbers))
    }
}

impl From<SelectedNumbers> for Vec<u8> {
    fn from(value: SelectedNumbers) -> Self {
        value.0
    }
}

/// Rows written before validation existed may hold anything, so unparsable
/// entries are skipped instead of failing the whole listing.
pub fn parse_stored_numbers(stored: &str) -> Vec<u8> {
    stored
        .split(',')
        .filter_map(|s| s.trim().parse::<u8>().ok())
        .collect()
}
