// Tuning knobs of the status engine. These are the only behavioural
// parameters of the whole system; the engine reads nothing else.

/// Mean Earth radius in kilometres, shared by every geometry routine.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Length of the trailing window inspected by the stationarity check.
pub const STATIONARY_WINDOW_MINUTES: i64 = 10;

/// Minimum number of history entries inside the window before a vehicle
/// may be called stationary. Fewer samples cannot tell "stuck" from
/// "just started".
pub const STATIONARY_MIN_SAMPLES: usize = 5;

/// Speeds strictly below this count as "not meaningfully moving" (km/h).
/// Also the floor between `warning` and `critical` for a moving vehicle.
pub const STATIONARY_SPEED_FLOOR_KMH: f64 = 8.0;

/// Scheduled ETA assumed when a vehicle carries none.
pub const DEFAULT_ETA_HORIZON_MINUTES: i64 = 60;

/// Ceiling for the reported required average speed (km/h). Policy choice,
/// not a physical derivation; revisit against real fleet data.
pub const MAX_REQUIRED_SPEED_KMH: f64 = 120.0;

/// Hours-to-destination reported for a vehicle with zero speed. Policy
/// choice, same caveat as `MAX_REQUIRED_SPEED_KMH`.
pub const STOPPED_HOURS_TO_DESTINATION: f64 = 999.0;

// Simulation cadence

/// Seconds between two simulation ticks (one history entry per tick).
pub const TICK_INTERVAL_SECS: u64 = 4;

/// History kept per vehicle: 30 minutes at one entry every 4 seconds.
pub const MAX_HISTORY_ENTRIES: usize = 450;

/// Upper bound for simulated vehicle speed (km/h).
pub const MAX_SIMULATED_SPEED_KMH: f64 = 90.0;

// Report output

pub const FLEET_REPORT_FILE: &str = "fleet_report.csv";
