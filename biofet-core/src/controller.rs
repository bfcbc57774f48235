//! Main controller coordinating commands, the run state machine and storage
//!
//! The controller is the single owner of all mutable rig state:
//! - Frames and interprets command lines from the host
//! - Mutates the test configuration
//! - Starts, stops and completes runs
//! - Drives the analog outputs on the update cadence
//! - Logs samples on the log cadence
//!
//! It is driven from one cooperative loop. A command's effect is complete
//! before [`Controller::tick`] next runs, and no storage operation is ever
//! in flight between calls.

use biofet_hal::flash::{JedecId, NorFlash};
use biofet_hal::uart::UartTx;
use biofet_protocol::{Command, ErrorCode, LineParser, Response};

use crate::config::{ControllerSettings, TestConfiguration, TestType};
use crate::run::{setpoint, RunTimer, SampleRecord, Setpoint};
use crate::state::{Event, State};
use crate::storage::{OffloadError, Storage, StorageError};
use crate::traits::{AnalogOutput, OutputChannel};

/// Where the active configuration came from at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigSource {
    /// Valid record found in flash
    Flash,
    /// No valid record; defaults in use
    Defaults,
    /// Record could not be read; defaults in use
    StorageFault(StorageError),
}

/// Outcome of [`Controller::boot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootReport {
    /// Flash id, if a device answered
    pub device_id: Option<JedecId>,
    pub config_source: ConfigSource,
    /// Recovered log length in bytes
    pub log_len: u32,
    /// A run was started by the boot-mode input
    pub auto_started: bool,
}

/// Controller state for coordinating subsystems
pub struct Controller<F, A> {
    /// Current run state
    state: State,
    /// Active test configuration
    config: TestConfiguration,
    settings: ControllerSettings,
    storage: Storage<F>,
    output: A,
    /// Timing of the run in progress
    run: Option<RunTimer>,
    parser: LineParser,
}

impl<F: NorFlash, A: AnalogOutput> Controller<F, A> {
    /// Create an idle controller with default configuration
    pub fn new(flash: F, output: A, settings: ControllerSettings) -> Self {
        Self {
            state: State::Idle,
            config: TestConfiguration::default(),
            settings,
            storage: Storage::new(flash),
            output,
            run: None,
            parser: LineParser::new(),
        }
    }

    /// Bring the controller up
    ///
    /// Forces safe outputs, loads the stored configuration (or defaults),
    /// recovers the log length, and starts a run if `auto_start` is set.
    pub fn boot(&mut self, auto_start: bool, now_ms: u32) -> BootReport {
        self.output.set_safe();

        let device_id = self.storage.read_id().ok().filter(JedecId::is_present);

        let config_source = match self.storage.load_config() {
            Ok(Some(config)) => {
                self.config = config;
                ConfigSource::Flash
            }
            Ok(None) => {
                self.config = TestConfiguration::default();
                ConfigSource::Defaults
            }
            Err(e) => {
                self.config = TestConfiguration::default();
                ConfigSource::StorageFault(e)
            }
        };

        let log_len = self.storage.recover_log().unwrap_or(0);
        let auto_started = auto_start && self.start_run(now_ms).is_ok();

        BootReport {
            device_id,
            config_source,
            log_len,
            auto_started,
        }
    }

    /// Get current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Get active configuration
    pub fn config(&self) -> &TestConfiguration {
        &self.config
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    #[cfg(test)]
    fn output(&self) -> &A {
        &self.output
    }

    #[cfg(test)]
    fn storage(&self) -> &Storage<F> {
        &self.storage
    }

    #[cfg(test)]
    fn storage_mut(&mut self) -> &mut Storage<F> {
        &mut self.storage
    }

    #[cfg(test)]
    fn release(self) -> (F, A) {
        (self.storage.into_inner(), self.output)
    }

    /// Feed one received byte
    ///
    /// Executes the command when the byte completes a line. Returns the
    /// executed command, if any.
    pub fn feed<T: UartTx>(
        &mut self,
        byte: u8,
        now_ms: u32,
        tx: &mut T,
    ) -> Result<Option<Command>, T::Error> {
        match self.parser.feed(byte) {
            Ok(Some(line)) => self.handle_line(&line, now_ms, tx),
            Ok(None) => Ok(None),
            Err(e) => {
                respond(tx, ErrorCode::from(e).into())?;
                Ok(None)
            }
        }
    }

    /// Interpret one complete command line
    fn handle_line<T: UartTx>(
        &mut self,
        line: &[u8],
        now_ms: u32,
        tx: &mut T,
    ) -> Result<Option<Command>, T::Error> {
        match Command::parse(line) {
            Ok(command) => {
                self.execute(command, now_ms, tx)?;
                Ok(Some(command))
            }
            Err(e) => {
                respond(tx, ErrorCode::from(e).into())?;
                Ok(None)
            }
        }
    }

    /// Execute a command and write its response
    fn execute<T: UartTx>(
        &mut self,
        command: Command,
        now_ms: u32,
        tx: &mut T,
    ) -> Result<(), T::Error> {
        let response = match command {
            Command::SetType(code) => match TestType::from_code(code) {
                Some(test_type) => {
                    self.config.test_type = test_type;
                    Response::Ok
                }
                None => ErrorCode::InvalidType.into(),
            },
            Command::SetTime(minutes) => {
                if self.config.set_run_time(minutes) {
                    Response::Ok
                } else {
                    ErrorCode::InvalidTime.into()
                }
            }
            Command::SaveConfig => storage_response(self.storage.save_config(&self.config)),
            Command::ClearFlash => storage_response(self.storage.clear()),
            Command::Start => storage_response(self.start_run(now_ms)),
            Command::Stop => {
                self.end_run(Event::Stop);
                Response::Ok
            }
            Command::ReadFlash => return self.read_flash(tx),
            Command::Ping => Response::Pong,
        };

        respond(tx, response)
    }

    /// Periodic tick update
    ///
    /// Call this regularly (at least as often as the update interval) with
    /// the current timestamp. Returns an event if a run ended.
    pub fn tick<T: UartTx>(&mut self, now_ms: u32, tx: &mut T) -> Result<Option<Event>, T::Error> {
        let elapsed_ms = match &self.run {
            Some(run) => run.elapsed_ms(now_ms),
            None => return Ok(None),
        };

        if self.config.test_type == TestType::Ramp && elapsed_ms >= self.config.duration_ms() {
            self.end_run(Event::Complete);
            respond(tx, Response::TestComplete)?;
            return Ok(Some(Event::Complete));
        }

        let (update_due, log_due) = match self.run.as_mut() {
            Some(run) => (run.update_due(now_ms), run.log_due(now_ms)),
            None => return Ok(None),
        };

        let target = setpoint(&self.config, self.settings.ramp_ceiling_v, elapsed_ms);
        if update_due {
            self.apply(target);
        }

        if log_due {
            let record = SampleRecord {
                elapsed_ms,
                primary_v: target.primary_v,
                secondary_v: target.secondary_v,
            };
            if let Err(e) = self.log_sample(&record) {
                self.end_run(Event::Fault);
                respond(tx, ErrorCode::from(e).into())?;
                return Ok(Some(Event::Fault));
            }
        }

        Ok(None)
    }

    /// Enter `Running` with a fresh log
    fn start_run(&mut self, now_ms: u32) -> Result<(), StorageError> {
        if let Err(e) = self.storage.begin_log() {
            self.end_run(Event::Fault);
            return Err(e);
        }

        self.run = Some(RunTimer::start(
            now_ms,
            self.settings.update_interval_ms,
            self.settings.log_interval_ms,
        ));
        self.transition(Event::Start);
        Ok(())
    }

    /// Leave `Running` (if running) with both outputs at 0 V
    fn end_run(&mut self, event: Event) {
        self.output.set_safe();
        self.run = None;
        self.transition(event);
    }

    fn apply(&mut self, target: Setpoint) {
        self.output.set_voltage(OutputChannel::Primary, target.primary_v);
        self.output.set_voltage(OutputChannel::Secondary, target.secondary_v);
    }

    fn log_sample(&mut self, record: &SampleRecord) -> Result<(), StorageError> {
        // Only non-finite or absurd voltages fail to encode; drop that sample
        match record.encode() {
            Ok(line) => self.storage.append(line.as_bytes()),
            Err(_) => Ok(()),
        }
    }

    fn read_flash<T: UartTx>(&mut self, tx: &mut T) -> Result<(), T::Error> {
        respond(tx, Response::BeginData)?;
        match self.storage.offload(tx) {
            Ok(()) => {}
            Err(OffloadError::Link(e)) => return Err(e),
            Err(OffloadError::Storage(e)) => respond(tx, ErrorCode::from(e).into())?,
        }
        respond(tx, Response::EndData)?;
        tx.flush()
    }

    /// Perform state transition
    fn transition(&mut self, event: Event) {
        self.state = self.state.transition(event);
    }
}

fn storage_response(result: Result<(), StorageError>) -> Response {
    match result {
        Ok(()) => Response::Ok,
        Err(e) => ErrorCode::from(e).into(),
    }
}

fn respond<T: UartTx>(tx: &mut T, response: Response) -> Result<(), T::Error> {
    tx.write_line(response.as_str())
}
