use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr};

// Kernel names are at most 15 bytes (IFNAMSIZ - 1)
static INTERFACE_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_.:-]{1,15}$").expect("Failed to compile interface name pattern")
});

/// Validation of user-supplied network settings
pub struct InputValidator;

impl InputValidator {
    /// Dotted-quad IPv4 address
    pub fn validate_ipv4(value: &str) -> Result<Ipv4Addr, ValidationError> {
        value
            .trim()
            .parse::<Ipv4Addr>()
            .map_err(|_| ValidationError::InvalidIpv4(value.to_string()))
    }

    /// Dotted-quad netmask whose set bits are contiguous from the left
    pub fn validate_netmask(value: &str) -> Result<Ipv4Addr, ValidationError> {
        let mask = value
            .trim()
            .parse::<Ipv4Addr>()
            .map_err(|_| ValidationError::InvalidNetmask(value.to_string()))?;

        let bits = u32::from(mask);
        if bits.leading_ones() + bits.trailing_zeros() != 32 {
            return Err(ValidationError::InvalidNetmask(value.to_string()));
        }

        Ok(mask)
    }

    pub fn validate_nameserver(value: &str) -> Result<IpAddr, ValidationError> {
        value
            .trim()
            .parse::<IpAddr>()
            .map_err(|_| ValidationError::InvalidNameserver(value.to_string()))
    }

    pub fn validate_interface_name(name: &str) -> Result<(), ValidationError> {
        if name == "." || name == ".." || !INTERFACE_NAME_PATTERN.is_match(name) {
            return Err(ValidationError::InvalidInterfaceName(name.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4() {
        assert!(InputValidator::validate_ipv4("192.168.1.10").is_ok());
        assert!(InputValidator::validate_ipv4(" 10.0.0.1 ").is_ok());
        assert!(InputValidator::validate_ipv4("10.0.0.256").is_err());
        assert!(InputValidator::validate_ipv4("").is_err());
        assert!(InputValidator::validate_ipv4("fe80::1").is_err());
    }

    #[test]
    fn test_netmask() {
        assert!(InputValidator::validate_netmask("255.255.255.0").is_ok());
        assert!(InputValidator::validate_netmask("255.255.240.0").is_ok());
        assert!(InputValidator::validate_netmask("0.0.0.0").is_ok());
        assert!(InputValidator::validate_netmask("255.255.255.255").is_ok());
        assert_eq!(
            InputValidator::validate_netmask("255.0.255.0"),
            Err(ValidationError::InvalidNetmask("255.0.255.0".to_string()))
        );
        assert!(InputValidator::validate_netmask("24").is_err());
    }

    #[test]
    fn test_nameserver() {
        assert!(InputValidator::validate_nameserver("9.9.9.9").is_ok());
        assert!(InputValidator::validate_nameserver("2620:fe::fe").is_ok());
        assert!(InputValidator::validate_nameserver("dns.example").is_err());
    }

    #[test]
    fn test_interface_name() {
        assert!(InputValidator::validate_interface_name("eth0").is_ok());
        assert!(InputValidator::validate_interface_name("eth0.100").is_ok());
        assert!(InputValidator::validate_interface_name("enp0s31f6").is_ok());
        assert!(InputValidator::validate_interface_name("").is_err());
        assert!(InputValidator::validate_interface_name("..").is_err());
        assert!(InputValidator::validate_interface_name("../../passwd").is_err());
        assert!(InputValidator::validate_interface_name("eth 0").is_err());
        assert!(InputValidator::validate_interface_name("averyveryverylongname").is_err());
    }
}
