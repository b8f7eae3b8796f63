//! Error conversion implementations.
//!
//! `From` impls for the third-party and formatting errors that can surface
//! while building XML parts, decoding media or writing the archive.

use super::types::Error;

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Zip(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::MediaResolution {
            location: "inline data".to_string(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::ConfigurationError;

    #[test]
    fn test_fmt_error_becomes_xml_error() {
        let err: Error = std::fmt::Error.into();
        assert!(matches!(err, Error::Xml(_)));
    }

    #[test]
    fn test_configuration_error_display() {
        let err: Error = ConfigurationError::UnknownLayout("A5".to_string()).into();
        assert_eq!(err.to_string(), "Configuration error: unknown layout 'A5'");
    }
}
