use perturb_core::config::ConfigNode;
use perturb_core::error::ConfigError;

// ---------------------------------------------------------------------------
// Device
// ---------------------------------------------------------------------------

/// Lifecycle shared by sensors and actuators.
///
/// Per-tick methods differ between devices (a sensor reads a body, an
/// actuator writes one), so only configuration and reset are common.
pub trait Device {
    /// Read this device's configuration node, including its noise tags.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from a noise tag, wrapped with the device name and
    /// the channel's tag.
    fn init(&mut self, node: &ConfigNode) -> Result<(), ConfigError>;

    /// Return to the state right after [`init`](Self::init).
    fn reset(&mut self);

    /// Human-readable name for this device.
    fn name(&self) -> &str;
}

/// Wrap a channel error with the channel tag and the owning device.
pub(crate) fn channel_error(device: &str, tag: &str) -> impl FnOnce(ConfigError) -> ConfigError + use<> {
    let device = device.to_owned();
    let tag = tag.to_owned();
    move |err| err.context(format!("channel `{tag}`")).context(device)
}
