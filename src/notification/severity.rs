/// Visual class of a toast. Picks its colour and icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    #[cfg(test)]
    pub const ALL: [Severity; 4] = [
        Severity::Info,
        Severity::Success,
        Severity::Warning,
        Severity::Error,
    ];

    /// Maps the names used by page markup. Anything unknown falls back to info.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "success" => Severity::Success,
            "warning" => Severity::Warning,
            "error" => Severity::Error,
            "info" => Severity::Info,
            other => {
                log::debug!("unknown notification type {:?}, using info", other);
                Severity::Info
            }
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Severity::Success => "#4CAF50",
            Severity::Error => "#f44336",
            Severity::Warning => "#ff9800",
            Severity::Info => "#2196F3",
        }
    }

    pub fn icon_class(&self) -> &'static str {
        match self {
            Severity::Success => "fas fa-check-circle",
            Severity::Error => "fas fa-exclamation-circle",
            Severity::Warning => "fas fa-exclamation-triangle",
            Severity::Info => "fas fa-info-circle",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_map_to_their_severity() {
        assert_eq!(Severity::from_name("success"), Severity::Success);
        assert_eq!(Severity::from_name("warning"), Severity::Warning);
        assert_eq!(Severity::from_name(" Error "), Severity::Error);
        assert_eq!(Severity::from_name("info"), Severity::Info);
    }

    #[test]
    fn unknown_names_fail_closed_to_info() {
        assert_eq!(Severity::from_name("critical"), Severity::Info);
        assert_eq!(Severity::from_name(""), Severity::Info);
    }

    #[test]
    fn every_severity_has_distinct_styling() {
        let colors: Vec<_> = Severity::ALL.iter().map(Severity::color).collect();
        for (i, c) in colors.iter().enumerate() {
            assert!(!colors[i + 1..].contains(c));
        }
        assert!(Severity::ALL.iter().all(|s| s.icon_class().starts_with("fas ")));
    }
}
