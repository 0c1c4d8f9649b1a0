use core::fmt;

/// Errors returned by the pin controller core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    /// Pin, community or pad group lookup failed
    NotFound,
    /// Pad group layout cannot be expressed in 32-bit status/enable words
    InvalidTopology,
    /// The pin already carries an interrupt registration
    AlreadyRegistered,
    /// The pin is in ACPI mode and cannot be armed as an interrupt
    ModeConflict,
    /// PADCFGLOCK or PADCFGLOCKTX is set for the pin
    PinLocked,
    /// The community lacks the hardware feature for the request
    NotSupported,
    InvalidArgument,
    /// The chipset descriptor set is empty or inconsistent
    MissingPlatformData,
    NoMemory,
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            GpioError::NotFound => "no such pin, community or pad group",
            GpioError::InvalidTopology => "invalid pad group topology",
            GpioError::AlreadyRegistered => "pin already has an interrupt owner",
            GpioError::ModeConflict => "pin is in ACPI mode",
            GpioError::PinLocked => "pin configuration is locked",
            GpioError::NotSupported => "not supported by this community",
            GpioError::InvalidArgument => "invalid argument",
            GpioError::MissingPlatformData => "missing platform data",
            GpioError::NoMemory => "out of memory",
        };
        f.write_str(msg)
    }
}

pub type GpioResult<T> = core::result::Result<T, GpioError>;

impl From<alloc::collections::TryReserveError> for GpioError {
    fn from(_: alloc::collections::TryReserveError) -> Self {
        GpioError::NoMemory
    }
}
