pub mod config;
pub mod error;
pub mod filter;
pub mod ids;
pub mod logging;
pub mod model;
pub mod mutation;
pub mod progress;
pub mod storage;
pub mod tracker_api;
pub mod view;

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::model::{StatusFilter, TaskStatus, Theme, Title};

    #[test]
    fn app_error_exposes_code_and_message() {
        let err = AppError::invalid_input("missing title");
        assert_eq!(err.code(), "invalid_input");
        assert_eq!(err.message(), "missing title");
        assert_eq!(err.to_string(), "invalid_input - missing title");
    }

    #[test]
    fn io_errors_convert() {
        let err: AppError = std::io::Error::other("disk full").into();
        assert_eq!(err.code(), "io_error");
    }

    #[test]
    fn title_is_trimmed_and_required() {
        assert_eq!(Title::parse("  Hooks ").unwrap().as_str(), "Hooks");
        assert_eq!(Title::parse(" \n\t").unwrap_err().code(), "invalid_input");
    }

    #[test]
    fn status_has_exactly_three_spellings() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
        assert!("completed".parse::<TaskStatus>().is_err());
        assert!("all".parse::<TaskStatus>().is_err());
        assert!("".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn filter_accepts_all_and_statuses() {
        assert_eq!("All".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("done".parse::<StatusFilter>().unwrap(), StatusFilter::Done);
        assert_eq!(
            "pending".parse::<StatusFilter>().unwrap_err().code(),
            "invalid_input"
        );
        assert!(StatusFilter::All.matches(TaskStatus::Ongoing));
        assert!(!StatusFilter::Upcoming.matches(TaskStatus::Done));
    }

    #[test]
    fn theme_names_are_canonicalized() {
        assert_eq!(Theme::canonical("Vanilla"), Some(Theme::Light));
        assert_eq!(Theme::canonical("dark-mode"), Some(Theme::Dark));
        assert_eq!(Theme::canonical("  "), Some(Theme::Light));
        assert_eq!("  ".parse::<Theme>().unwrap_err().message(), "theme is required");
        assert_eq!("-".parse::<Theme>().unwrap_err().code(), "invalid_input");
        assert_eq!(" Night ".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::canonical("solarized"), None);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
