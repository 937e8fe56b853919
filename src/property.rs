use serde::Serialize;
use std::env;

use crate::error::InstallError;

/// Look up `name` in the process environment.
pub fn get_property(name: &str) -> Result<Option<String>, InstallError> {
    if name.trim().is_empty() {
        return Err(InstallError::InvalidArgument(
            "property name must not be blank".to_string(),
        ));
    }
    Ok(env::var(name).ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PropertyName {
    Australia,
    UnitedStates,
    Germany,
    NotSpecified,
}

impl PropertyName {
    pub const ALL: [PropertyName; 4] = [
        PropertyName::Australia,
        PropertyName::UnitedStates,
        PropertyName::Germany,
        PropertyName::NotSpecified,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Australia => "Australia",
            Self::UnitedStates => "United States",
            Self::Germany => "Germany",
            Self::NotSpecified => "None of your business!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PropertyName, get_property};
    use crate::error::InstallError;

    #[test]
    fn blank_names_are_rejected() {
        for name in ["", "   "] {
            assert!(matches!(
                get_property(name),
                Err(InstallError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn path_lookup_succeeds() {
        assert!(get_property("PATH").is_ok());
        assert_eq!(
            get_property("TBOOTSTRAP_SURELY_UNSET_PROPERTY").expect("lookup"),
            None
        );
    }

    #[test]
    fn catalog_display_names() {
        let names = PropertyName::ALL
            .iter()
            .map(|p| p.display_name())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["Australia", "United States", "Germany", "None of your business!"]
        );
    }
}
