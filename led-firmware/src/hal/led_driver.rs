// ESP32-C6 LED Treiber
//
// Implementiert den LedDriver-Trait aus led-core für das Board:
// - LEDs ohne PWM: GPIO-Ausgänge (esp-hal Output) über led-core's OutputBank
// - PWM-fähige LEDs: LEDC Low-Speed-Kanäle an einem gemeinsamen Timer
//
// Ein LEDC-Pin gehört dem LEDC-Kanal. Ein/Aus wird dort als 0 % / 100 % Duty
// ausgegeben, Zwischenwerte als echter Duty-Cycle.

use defmt::info;
use esp_hal::gpio::interconnect::PeripheralOutput;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::ledc::channel::{self, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::peripherals::{GPIO4, GPIO5, GPIO6, GPIO7, LEDC};
use esp_hal::time::Rate;
use led_core::{LedDescriptor, LedDriver, LedError, OutputBank, PinRef, PinState, PwmChannel};
use static_cell::StaticCell;

use crate::config::{
    BOARD_LEDS, GPIO_LED_COUNT, LED_PWM_FREQUENCY_HZ, LED_PWM_MAX_DUTY, PWM_LED_COUNT,
};

/// LEDC Timer muss 'static sein (Kanäle halten eine Referenz darauf)
static LEDC_TIMER: StaticCell<timer::Timer<'static, LowSpeed>> = StaticCell::new();

// ============================================================================
// LEDC Line
// ============================================================================

/// Ein LEDC-Kanal mit zugehörigem Pin
struct PwmLine {
    pin: PinRef,
    channel: PwmChannel,
    ledc: channel::Channel<'static, LowSpeed>,
    /// Pegel im Ein/Aus-Betrieb
    level: PinState,
    /// Programmierter Duty (Prozent), solange PWM aktiv ist
    duty: Option<u16>,
}

impl PwmLine {
    fn write_duty(&mut self, duty_pct: u8) -> Result<(), LedError> {
        self.ledc
            .set_duty(duty_pct)
            .map_err(|_| LedError::WriteFailed)
    }

    fn write_level(&mut self, level: PinState) -> Result<(), LedError> {
        self.write_duty(duty_pct_for(level))?;
        self.level = level;
        Ok(())
    }
}

// ============================================================================
// EspLedDriver
// ============================================================================

/// LED-Treiber des Boards
pub struct EspLedDriver {
    gpio: OutputBank<Output<'static>, GPIO_LED_COUNT>,
    pwm: [PwmLine; PWM_LED_COUNT],
}

impl EspLedDriver {
    /// Erstellt den Treiber
    ///
    /// Pin-Zuordnung siehe `BOARD_LEDS` in config.rs:
    /// GPIO4/GPIO5 → LEDC Kanal 0/1, GPIO6/GPIO7 → GPIO-Ausgang.
    /// Alle Ausgänge starten im inaktiven Pegel ihrer LED.
    ///
    /// # Fehlerbehandlung
    /// `LedError::PwmUnavailable` wenn Timer oder Kanal nicht konfigurierbar sind
    pub fn new(
        gpio4: GPIO4<'static>,
        gpio5: GPIO5<'static>,
        gpio6: GPIO6<'static>,
        gpio7: GPIO7<'static>,
        ledc_peripheral: LEDC<'static>,
    ) -> Result<Self, LedError> {
        let [led1, led2, led3, led4] = &BOARD_LEDS;

        // GPIO-Ausgänge (Push-Pull), Startpegel = LED aus
        let gpio = OutputBank::new([
            (
                led3.pin,
                Output::new(gpio6, level(led3.polarity.inactive()), OutputConfig::default()),
            ),
            (
                led4.pin,
                Output::new(gpio7, level(led4.polarity.inactive()), OutputConfig::default()),
            ),
        ]);

        // LEDC: APB Clock, ein Low-Speed Timer für beide Kanäle
        let mut ledc = Ledc::new(ledc_peripheral);
        ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

        let lstimer = LEDC_TIMER.init(ledc.timer::<LowSpeed>(timer::Number::Timer0));
        lstimer
            .configure(timer::config::Config {
                duty: timer::config::Duty::Duty10Bit,
                clock_source: timer::LSClockSource::APBClk,
                frequency: Rate::from_hz(LED_PWM_FREQUENCY_HZ),
            })
            .map_err(|_| LedError::PwmUnavailable)?;
        let lstimer: &'static timer::Timer<'static, LowSpeed> = lstimer;

        let pwm = [
            configure_pwm_line(&ledc, lstimer, channel::Number::Channel0, gpio4, led1)?,
            configure_pwm_line(&ledc, lstimer, channel::Number::Channel1, gpio5, led2)?,
        ];

        info!(
            "LED driver ready: {} GPIO + {} LEDC @ {} Hz",
            GPIO_LED_COUNT, PWM_LED_COUNT, LED_PWM_FREQUENCY_HZ
        );

        Ok(Self { gpio, pwm })
    }

    fn pwm_line(&mut self, pin: PinRef) -> Option<&mut PwmLine> {
        self.pwm.iter_mut().find(|line| line.pin == pin)
    }

    fn pwm_channel(&self, channel: PwmChannel) -> Option<&PwmLine> {
        self.pwm.iter().find(|line| line.channel == channel)
    }
}

impl LedDriver for EspLedDriver {
    fn configure_output(&mut self, pin: PinRef, level: PinState) -> Result<(), LedError> {
        match self.pwm_line(pin) {
            Some(line) => {
                line.duty = None;
                line.write_level(level)
            }
            None => self.gpio.configure_output(pin, level),
        }
    }

    fn set_level(&mut self, pin: PinRef, level: PinState) -> Result<(), LedError> {
        match self.pwm_line(pin) {
            Some(line) => line.write_level(level),
            None => self.gpio.set_level(pin, level),
        }
    }

    fn level(&mut self, pin: PinRef) -> Result<PinState, LedError> {
        match self.pwm_line(pin) {
            Some(line) => Ok(line.level),
            None => self.gpio.level(pin),
        }
    }

    fn toggle(&mut self, pin: PinRef) -> Result<(), LedError> {
        if self.gpio.contains(pin) {
            return self.gpio.toggle(pin);
        }
        let level = self.level(pin)?;
        self.set_level(pin, !level)
    }

    fn pwm_max_duty(&self, channel: PwmChannel) -> Option<u16> {
        self.pwm_channel(channel).map(|_| LED_PWM_MAX_DUTY)
    }

    fn pwm_enable(&mut self, pin: PinRef, channel: PwmChannel, duty: u16) -> Result<(), LedError> {
        let line = self
            .pwm_line(pin)
            .filter(|line| line.channel == channel)
            .ok_or(LedError::PwmUnavailable)?;
        let duty = duty.min(LED_PWM_MAX_DUTY);
        line.write_duty(duty as u8)?;
        line.duty = Some(duty);
        Ok(())
    }

    fn pwm_disable(&mut self, pin: PinRef, channel: PwmChannel) -> Result<(), LedError> {
        match self.pwm_line(pin).filter(|line| line.channel == channel) {
            Some(line) => {
                line.duty = None;
                // Ein/Aus-Pegel von vor der PWM wiederherstellen
                let level = line.level;
                line.write_level(level)
            }
            None => Ok(()),
        }
    }

    fn pwm_duty(&self, channel: PwmChannel) -> Option<u16> {
        self.pwm_channel(channel)?.duty
    }
}

/// Konfiguriert einen LEDC-Kanal für eine LED (Startpegel = aus)
fn configure_pwm_line(
    ledc: &Ledc<'static>,
    lstimer: &'static timer::Timer<'static, LowSpeed>,
    number: channel::Number,
    pin: impl PeripheralOutput<'static>,
    descriptor: &LedDescriptor,
) -> Result<PwmLine, LedError> {
    let pwm_channel = descriptor.pwm.ok_or(LedError::PwmUnavailable)?;
    let level = descriptor.polarity.inactive();

    let mut ledc_channel = ledc.channel(number, pin);
    ledc_channel
        .configure(channel::config::Config {
            timer: lstimer,
            duty_pct: duty_pct_for(level),
            pin_config: channel::config::PinConfig::PushPull,
        })
        .map_err(|_| LedError::PwmUnavailable)?;

    Ok(PwmLine {
        pin: descriptor.pin,
        channel: pwm_channel,
        ledc: ledc_channel,
        level,
        duty: None,
    })
}

fn level(state: PinState) -> Level {
    match state {
        PinState::High => Level::High,
        PinState::Low => Level::Low,
    }
}

fn duty_pct_for(state: PinState) -> u8 {
    match state {
        PinState::High => LED_PWM_MAX_DUTY as u8,
        PinState::Low => 0,
    }
}
