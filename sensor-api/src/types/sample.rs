use chrono::Utc;
use mongodb::bson::{doc, DateTime, Document};
use rand::Rng;

/// Number of EMG channels produced by the hand sensor.
pub const EMG_CHANNELS: usize = 8;

/// A synthetic hand-data record, used to seed collections for manual testing.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSample {
    pub emg_signals: Vec<f64>,
    pub ed_mvc: f64,
    pub fd_mvc: f64,
    pub session_time: f64,
}

impl SensorSample {
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            emg_signals: (0..EMG_CHANNELS).map(|_| rng.gen_range(0.0..1.0)).collect(),
            ed_mvc: rng.gen_range(0.0..100.0),
            fd_mvc: rng.gen_range(0.0..100.0),
            session_time: rng.gen_range(0.0..3600.0),
        }
    }

    pub fn into_document(self) -> Document {
        doc! {
            "timestamp": DateTime::from_chrono(Utc::now()),
            "emg_signals": self.emg_signals,
            "ed_mvc": self.ed_mvc,
            "fd_mvc": self.fd_mvc,
            "session_time": self.session_time,
        }
    }
}
