use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::codec::parse_int;
use crate::error::FingerprintError;

/// SETTINGS parameters announced in the client preface. `None` means the
/// parameter was not sent; zero is a legal value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsFrame {
    pub header_table_size: Option<u32>,
    pub enable_push: Option<u32>,
    pub max_concurrent_streams: Option<u32>,
    pub initial_window_size: Option<u32>,
    pub max_frame_size: Option<u32>,
    pub max_header_list_size: Option<u32>,
}

impl SettingsFrame {
    /// Integer stand-in for a parameter that was not sent.
    pub const ABSENT: i64 = -1;

    /// Parameters in SETTINGS id order (1..=6), absent ones as [`Self::ABSENT`].
    pub fn sentinel_values(&self) -> [i64; 6] {
        [
            self.header_table_size,
            self.enable_push,
            self.max_concurrent_streams,
            self.initial_window_size,
            self.max_frame_size,
            self.max_header_list_size,
        ]
        .map(|v| v.map_or(Self::ABSENT, i64::from))
    }

    fn slot(&mut self, id: &str) -> Option<&mut Option<u32>> {
        match id {
            "1" => Some(&mut self.header_table_size),
            "2" => Some(&mut self.enable_push),
            "3" => Some(&mut self.max_concurrent_streams),
            "4" => Some(&mut self.initial_window_size),
            "5" => Some(&mut self.max_frame_size),
            "6" => Some(&mut self.max_header_list_size),
            _ => None,
        }
    }
}

/// One PRIORITY entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityFrame {
    pub stream_id: u32,
    pub stream_dependency: u32,
    pub exclusive: bool,
    pub weight: u16,
}

/// Pseudo-header field of a HEADERS frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum PseudoHeader {
    Method,
    Path,
    Authority,
    Scheme,
    /// Code the decoder did not recognise; renders as an empty string.
    Unknown,
}

impl PseudoHeader {
    /// Decode the one-letter code used in the fingerprint string.
    pub fn from_code(code: &str) -> Self {
        match code {
            "m" => Self::Method,
            "p" => Self::Path,
            "a" => Self::Authority,
            "s" => Self::Scheme,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Method => ":method",
            Self::Path => ":path",
            Self::Authority => ":authority",
            Self::Scheme => ":scheme",
            Self::Unknown => "",
        }
    }
}

impl From<PseudoHeader> for &'static str {
    fn from(h: PseudoHeader) -> Self {
        h.as_str()
    }
}

impl From<String> for PseudoHeader {
    fn from(s: String) -> Self {
        match s.as_str() {
            ":method" => Self::Method,
            ":path" => Self::Path,
            ":authority" => Self::Authority,
            ":scheme" => Self::Scheme,
            _ => Self::Unknown,
        }
    }
}

/// Decoded HTTP/2 connection-preface fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Http2Fingerprint {
    /// The string this was decoded from
    pub fingerprint: String,
    pub settings: SettingsFrame,
    pub window_update_increment: Option<u32>,
    pub priority_frames: Vec<PriorityFrame>,
    pub pseudo_header_order: Vec<PseudoHeader>,
    /// Priority attached to the captured SETTINGS frame, see [`header_frame_priority`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_frame_priority: Option<PriorityFrame>,
}

impl Http2Fingerprint {
    /// MD5 of the fingerprint string, lowercase hex.
    pub fn akamai_hash(&self) -> String {
        let mut hasher = Md5::new();
        hasher.update(self.fingerprint.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Decode an Akamai HTTP/2 fingerprint string.
///
/// Format: `SETTINGS|WINDOW_UPDATE|PRIORITY|PSEUDO_HEADER_ORDER`, for example
/// `1:65536,2:0,4:6291456,6:262144|15663105|0|m,a,s,p`.
///
/// Missing trailing sections decode as absent. Unknown SETTINGS ids and
/// unknown pseudo-header codes are not errors.
pub fn parse_akamai(s: &str) -> Result<Http2Fingerprint, FingerprintError> {
    let mut sections = s.split('|');
    let settings = parse_settings(sections.next().unwrap_or(""))?;
    let window_update_increment = match sections.next() {
        Some(section) if !section.is_empty() => Some(parse_int("window update", section)?),
        _ => None,
    };
    let priority_frames = parse_priority_frames(sections.next().unwrap_or(""))?;
    let pseudo_header_order = parse_pseudo_header_order(sections.next().unwrap_or(""));

    Ok(Http2Fingerprint {
        fingerprint: s.to_string(),
        settings,
        window_update_increment,
        priority_frames,
        pseudo_header_order,
        header_frame_priority: None,
    })
}

/// `id:value` pairs; pairs that do not split in two are skipped.
fn parse_settings(section: &str) -> Result<SettingsFrame, FingerprintError> {
    let mut settings = SettingsFrame::default();
    for pair in section.split(',') {
        let [id, value] = pair.split(':').collect::<Vec<_>>()[..] else {
            continue;
        };
        let value = parse_int("settings value", value)?;
        if let Some(slot) = settings.slot(id) {
            *slot = Some(value);
        }
    }
    Ok(settings)
}

/// `streamId:flag:dependency:weight` tuples, or a lone `0` for none.
///
/// The exclusive flag is read from the dependency position (index 2), the
/// layout existing captures use.
fn parse_priority_frames(section: &str) -> Result<Vec<PriorityFrame>, FingerprintError> {
    if section == "0" {
        return Ok(Vec::new());
    }

    let mut frames = Vec::new();
    for tuple in section.split(',') {
        let [stream_id, _, dependency, weight] = tuple.split(':').collect::<Vec<_>>()[..] else {
            continue;
        };
        frames.push(PriorityFrame {
            stream_id: parse_int("priority stream id", stream_id)?,
            stream_dependency: parse_int("priority dependency", dependency)?,
            exclusive: dependency == "1",
            weight: parse_int("priority weight", weight)?,
        });
    }
    Ok(frames)
}

fn parse_pseudo_header_order(section: &str) -> Vec<PseudoHeader> {
    if section.is_empty() {
        return Vec::new();
    }
    section.split(',').map(PseudoHeader::from_code).collect()
}

/// A frame from a capture service's `sent_frames` list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SentFrame {
    pub frame_type: String,
    #[serde(default)]
    pub length: i64,
    #[serde(default)]
    pub settings: Vec<String>,
    #[serde(default)]
    pub increment: Option<i64>,
    #[serde(default)]
    pub stream_id: Option<i64>,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub priority: Option<FramePriority>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct FramePriority {
    pub weight: i64,
    pub depends_on: i64,
    pub exclusive: i64,
}

/// Priority for the HEADERS frame, taken from the first captured frame of
/// type `SETTINGS`.
///
/// Returns `None` when there is no such frame or it carries no priority. A
/// missing stream id counts as stream 0.
// TODO: switch the selector to "HEADERS" once a second capture confirms
// which frame type the priority really belongs to.
pub fn header_frame_priority(
    frames: &[SentFrame],
) -> Result<Option<PriorityFrame>, FingerprintError> {
    let Some(frame) = frames.iter().find(|f| f.frame_type == "SETTINGS") else {
        return Ok(None);
    };
    let Some(priority) = frame.priority else {
        return Ok(None);
    };

    let narrow = |field: &'static str, v: i64| {
        u32::try_from(v).map_err(|_| FingerprintError::unsupported(field, v))
    };
    Ok(Some(PriorityFrame {
        stream_id: narrow("stream id", frame.stream_id.unwrap_or(0))?,
        stream_dependency: narrow("priority dependency", priority.depends_on)?,
        exclusive: priority.exclusive == 1,
        weight: u16::try_from(priority.weight)
            .map_err(|_| FingerprintError::unsupported("priority weight", priority.weight))?,
    }))
}
