//! One-shot board bring-up and the pin handles built on it.
//!
//! Configures ADC1, the GPIO directions and the motor LEDC channel using
//! raw ESP-IDF sys calls, then hands out small handle types that
//! implement the `embedded-hal` traits (and [`AnalogSource`]) so the
//! generic drivers can sit on top of them.
//!
//! On non-espidf targets every call is an inert simulation stub.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::SensorError;
use crate::pins;
use crate::sensors::analog::AnalogSource;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc)   => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

/// A non-zero `esp_err_t` from a pin or PWM register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinError(pub i32);

impl embedded_hal::digital::Error for PinError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl embedded_hal::pwm::Error for PinError {
    fn kind(&self) -> embedded_hal::pwm::ErrorKind {
        embedded_hal::pwm::ErrorKind::Other
    }
}

#[cfg(target_os = "espidf")]
fn check(rc: i32) -> Result<(), PinError> {
    if rc == ESP_OK as i32 { Ok(()) } else { Err(PinError(rc)) }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [pins::RAIN_ADC_CHANNEL, pins::LIGHT_ADC_CHANNEL] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    info!(
        "hw_init: ADC1 configured (CH{}=rain, CH{}=light)",
        pins::RAIN_ADC_CHANNEL,
        pins::LIGHT_ADC_CHANNEL
    );
    Ok(())
}

/// An ADC1 channel, read as a 12-bit sample and scaled to 0–1023.
pub struct Adc1Channel {
    channel: u32,
}

impl Adc1Channel {
    pub const fn new(channel: u32) -> Self {
        Self { channel }
    }

    pub const fn rain() -> Self {
        Self::new(pins::RAIN_ADC_CHANNEL)
    }

    pub const fn light() -> Self {
        Self::new(pins::LIGHT_ADC_CHANNEL)
    }
}

/// 12-bit ADC count to the 10-bit range the thresholds are expressed in.
pub const fn scale_12_to_10(raw: u16) -> u16 {
    (raw >> 2) & 0x3FF
}

impl AnalogSource for Adc1Channel {
    #[cfg(target_os = "espidf")]
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        let mut raw: i32 = 0;
        // SAFETY: adc1_handle() contract; single-threaded main-loop access only.
        let ret = unsafe { adc_oneshot_read(adc1_handle(), self.channel, &mut raw) };
        if ret != ESP_OK as i32 {
            return Err(SensorError::AdcReadFailed);
        }
        Ok(scale_12_to_10(raw.clamp(0, 4095) as u16))
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        let _ = self.channel;
        Err(SensorError::AdcReadFailed)
    }
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio() -> Result<(), HwInitError> {
    let cmd_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::COMMAND_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cmd_cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    for pin in [pins::MOTOR_IN1_GPIO, pins::MOTOR_IN2_GPIO] {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
        // Bridge starts de-energised.
        unsafe { gpio_set_level(pin, 0) };
    }
    Ok(())
}

/// A configured GPIO input.
pub struct GpioInput {
    pin: i32,
}

impl GpioInput {
    pub const fn new(pin: i32) -> Self {
        Self { pin }
    }

    pub const fn command_line() -> Self {
        Self::new(pins::COMMAND_GPIO)
    }
}

impl embedded_hal::digital::ErrorType for GpioInput {
    type Error = PinError;
}

impl embedded_hal::digital::InputPin for GpioInput {
    #[cfg(target_os = "espidf")]
    fn is_high(&mut self) -> Result<bool, PinError> {
        // SAFETY: gpio_get_level is a read-only register access on a
        // pin configured in init_gpio().
        Ok(unsafe { gpio_get_level(self.pin) } != 0)
    }

    #[cfg(not(target_os = "espidf"))]
    fn is_high(&mut self) -> Result<bool, PinError> {
        let _ = self.pin;
        Ok(false)
    }

    fn is_low(&mut self) -> Result<bool, PinError> {
        self.is_high().map(|high| !high)
    }
}

/// A configured GPIO output.
pub struct GpioOutput {
    pin: i32,
}

impl GpioOutput {
    pub const fn new(pin: i32) -> Self {
        Self { pin }
    }

    #[cfg(target_os = "espidf")]
    fn write(&mut self, high: bool) -> Result<(), PinError> {
        // SAFETY: pin was configured as an output in init_gpio(); main-loop only.
        check(unsafe { gpio_set_level(self.pin, u32::from(high)) })
    }

    #[cfg(not(target_os = "espidf"))]
    fn write(&mut self, _high: bool) -> Result<(), PinError> {
        let _ = self.pin;
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for GpioOutput {
    type Error = PinError;
}

impl embedded_hal::digital::OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), PinError> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), PinError> {
        self.write(true)
    }
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::MOTOR_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: pins::MOTOR_LEDC_CHANNEL,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        gpio_num: pins::MOTOR_EN_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    }) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    info!("hw_init: LEDC configured (motor=CH{})", pins::MOTOR_LEDC_CHANNEL);
    Ok(())
}

/// An 8-bit LEDC channel.
pub struct LedcPwm {
    channel: u32,
}

impl LedcPwm {
    pub const fn new(channel: u32) -> Self {
        Self { channel }
    }

    pub const fn motor_enable() -> Self {
        Self::new(pins::MOTOR_LEDC_CHANNEL)
    }
}

impl embedded_hal::pwm::ErrorType for LedcPwm {
    type Error = PinError;
}

impl embedded_hal::pwm::SetDutyCycle for LedcPwm {
    fn max_duty_cycle(&self) -> u16 {
        u16::from(u8::MAX)
    }

    #[cfg(target_os = "espidf")]
    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), PinError> {
        // SAFETY: channel was configured in init_ledc(); duty register
        // writes happen from the main loop only.
        unsafe {
            check(ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, self.channel, u32::from(duty)))?;
            check(ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, self.channel))
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn set_duty_cycle(&mut self, _duty: u16) -> Result<(), PinError> {
        let _ = self.channel;
        Ok(())
    }
}
