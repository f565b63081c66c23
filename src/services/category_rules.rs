//! Field rules applied to category updates.

use crate::error::CategoryError;

/// Length limits for category fields, counted in characters.
///
/// Built once at startup and handed to [`CategoryService`](super::CategoryService).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRules {
    pub name_min_chars: usize,
    pub name_max_chars: usize,
    pub description_max_chars: usize,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            name_min_chars: 3,
            name_max_chars: 128,
            description_max_chars: 256,
        }
    }
}

impl CategoryRules {
    pub fn check_name(&self, name: &str) -> Result<(), CategoryError> {
        let len = name.chars().count();
        if len < self.name_min_chars || len > self.name_max_chars {
            return Err(CategoryError::NameLength);
        }
        Ok(())
    }

    pub fn check_description(&self, description: &str) -> Result<(), CategoryError> {
        if description.chars().count() > self.description_max_chars {
            return Err(CategoryError::DescriptionLength);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_name_boundaries() {
        let rules = CategoryRules::default();
        assert!(matches!(rules.check_name("ab"), Err(CategoryError::NameLength)));
        assert!(rules.check_name("abc").is_ok());
        assert!(rules.check_name(&"x".repeat(128)).is_ok());
        assert!(matches!(
            rules.check_name(&"x".repeat(129)),
            Err(CategoryError::NameLength)
        ));
    }

    #[test]
    fn test_description_boundaries() {
        let rules = CategoryRules::default();
        assert!(rules.check_description("").is_ok());
        assert!(rules.check_description(&"d".repeat(256)).is_ok());
        assert!(matches!(
            rules.check_description(&"d".repeat(257)),
            Err(CategoryError::DescriptionLength)
        ));
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        let rules = CategoryRules::default();
        // three characters, six bytes
        assert!(rules.check_name("еда").is_ok());
        assert!(rules.check_description(&"ё".repeat(256)).is_ok());
    }

    proptest! {
        #[test]
        fn prop_name_accepted_iff_within_limits(name in "\\PC{0,140}") {
            let rules = CategoryRules::default();
            let len = name.chars().count();
            prop_assert_eq!(rules.check_name(&name).is_ok(), (3..=128).contains(&len));
        }
    }
}
