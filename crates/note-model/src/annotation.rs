//! Annotation value types and their wire records
//!
//! Each annotation kind is an immutable value object paired with a serde
//! record struct that defines the on-disk shape. Field names on the record
//! structs are part of the wire contract and must not change. Decoding is
//! defensive: optional fields fall back to documented defaults and a retired
//! stroke mode is dropped rather than surfaced as an error.

use serde::{Deserialize, Serialize};

/// A 2-D point in page-local coordinates.
///
/// Used both as a stroke sample and as the anchor of a note. The wire shape
/// is `{"x": number, "y": number}` for strokes; note records inline the two
/// fields instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Drawing mode of a stroke.
///
/// Wire tags: `0` = pen, `2` = eraser. Tag `1` was the retired highlighter
/// mode; it is deliberately unrepresentable here, so no current write path
/// can reintroduce it. Records carrying tag `1` are dropped on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeMode {
    Pen,
    Eraser,
}

impl StrokeMode {
    /// Wire tag for this mode.
    pub fn wire_tag(self) -> u8 {
        match self {
            StrokeMode::Pen => 0,
            StrokeMode::Eraser => 2,
        }
    }

    /// Decode a wire tag. Returns `None` for the retired highlighter tag (1)
    /// and for any tag this version does not know.
    pub fn from_wire_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(StrokeMode::Pen),
            2 => Some(StrokeMode::Eraser),
            _ => None,
        }
    }
}

/// A completed freehand stroke.
///
/// Points are ordered in draw order. A committed stroke always has at least
/// one point; `new` enforces this for the editing path by refusing an empty
/// point list.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Ordered stroke samples in page coordinates.
    pub points: Vec<Point>,
    /// Stroke width in page units, positive.
    pub width: f32,
    /// 32-bit ARGB color.
    pub color: u32,
    pub mode: StrokeMode,
}

impl Stroke {
    /// Create a committed stroke. Returns `None` when `points` is empty.
    pub fn new(points: Vec<Point>, width: f32, color: u32, mode: StrokeMode) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self { points, width, color, mode })
    }
}

/// Wire record for a stroke: `{"points": [...], "width", "color", "mode"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeRecord {
    pub points: Vec<Point>,
    pub width: f32,
    pub color: u32,
    pub mode: u8,
}

impl StrokeRecord {
    /// Decode into a value, filtering strokes whose mode is no longer
    /// representable. This is the single place the one-way highlighter
    /// migration happens.
    pub fn into_stroke(self) -> Option<Stroke> {
        let mode = StrokeMode::from_wire_tag(self.mode)?;
        Some(Stroke { points: self.points, width: self.width, color: self.color, mode })
    }
}

impl From<&Stroke> for StrokeRecord {
    fn from(stroke: &Stroke) -> Self {
        Self {
            points: stroke.points.clone(),
            width: stroke.width,
            color: stroke.color,
            mode: stroke.mode.wire_tag(),
        }
    }
}

/// A free-text note anchored to a page position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextNote {
    pub anchor: Point,
    pub text: String,
    pub label: Option<String>,
}

/// Wire record for a text note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNoteRecord {
    pub x: f32,
    pub y: f32,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl From<&TextNote> for TextNoteRecord {
    fn from(note: &TextNote) -> Self {
        Self { x: note.anchor.x, y: note.anchor.y, text: note.text.clone(), label: note.label.clone() }
    }
}

impl From<TextNoteRecord> for TextNote {
    fn from(record: TextNoteRecord) -> Self {
        Self { anchor: Point::new(record.x, record.y), text: record.text, label: record.label }
    }
}

/// An audio-pin note.
///
/// Owns only the *reference* to the recorded clip; the bytes belong to the
/// asset storage collaborator. Deleting this note does not delete the clip.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioNote {
    pub anchor: Point,
    /// Path of the externally stored audio asset.
    pub file_path: String,
    /// Clip duration in milliseconds.
    pub duration_ms: u64,
    pub label: Option<String>,
}

/// Wire record for an audio note.
///
/// Early encoders wrote `file` and `dur`; those are accepted as aliases of
/// the current `filePath` / `durationMs` names. A missing duration decodes
/// as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioNoteRecord {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "filePath", alias = "file")]
    pub file_path: String,
    #[serde(rename = "durationMs", alias = "dur", default)]
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl From<&AudioNote> for AudioNoteRecord {
    fn from(note: &AudioNote) -> Self {
        Self {
            x: note.anchor.x,
            y: note.anchor.y,
            file_path: note.file_path.clone(),
            duration_ms: note.duration_ms,
            label: note.label.clone(),
        }
    }
}

impl From<AudioNoteRecord> for AudioNote {
    fn from(record: AudioNoteRecord) -> Self {
        Self {
            anchor: Point::new(record.x, record.y),
            file_path: record.file_path,
            duration_ms: record.duration_ms,
            label: record.label,
        }
    }
}

/// An image note. Same asset-ownership rule as [`AudioNote`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImageNote {
    pub anchor: Point,
    /// Path of the externally stored image asset.
    pub file_path: String,
    /// Display width in page units, positive.
    pub width: f32,
    /// Display height in page units, positive.
    pub height: f32,
    /// Rotation in radians. Records written before rotation existed decode
    /// as 0.
    pub rotation: f32,
}

/// Wire record for an image note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageNoteRecord {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "filePath")]
    pub file_path: String,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub rotation: f32,
}

impl From<&ImageNote> for ImageNoteRecord {
    fn from(note: &ImageNote) -> Self {
        Self {
            x: note.anchor.x,
            y: note.anchor.y,
            file_path: note.file_path.clone(),
            width: note.width,
            height: note.height,
            rotation: note.rotation,
        }
    }
}

impl From<ImageNoteRecord> for ImageNote {
    fn from(record: ImageNoteRecord) -> Self {
        Self {
            anchor: Point::new(record.x, record.y),
            file_path: record.file_path,
            width: record.width,
            height: record.height,
            rotation: record.rotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_round_trip() {
        let stroke = Stroke::new(
            vec![Point::new(1.0, 2.0), Point::new(3.5, -4.25)],
            2.5,
            0xFF00_66CC,
            StrokeMode::Pen,
        )
        .expect("non-empty stroke");

        let record = StrokeRecord::from(&stroke);
        assert_eq!(record.mode, 0);
        assert_eq!(record.into_stroke(), Some(stroke));
    }

    #[test]
    fn eraser_round_trip_keeps_mode_tag() {
        let stroke =
            Stroke::new(vec![Point::new(0.0, 0.0)], 8.0, 0, StrokeMode::Eraser).expect("stroke");
        let record = StrokeRecord::from(&stroke);
        assert_eq!(record.mode, 2);
        assert_eq!(record.into_stroke().expect("decodes").mode, StrokeMode::Eraser);
    }

    #[test]
    fn legacy_highlighter_mode_is_dropped() {
        let record = StrokeRecord {
            points: vec![Point::new(1.0, 1.0)],
            width: 12.0,
            color: 0x80FF_FF00,
            mode: 1,
        };
        assert_eq!(record.into_stroke(), None);
    }

    #[test]
    fn unknown_mode_tag_is_dropped() {
        let record =
            StrokeRecord { points: vec![Point::new(0.0, 0.0)], width: 1.0, color: 0, mode: 7 };
        assert_eq!(record.into_stroke(), None);
    }

    #[test]
    fn empty_stroke_is_rejected_by_constructor() {
        assert_eq!(Stroke::new(Vec::new(), 1.0, 0, StrokeMode::Pen), None);
    }

    #[test]
    fn text_note_round_trip() {
        let note = TextNote {
            anchor: Point::new(10.0, 20.0),
            text: "remember this".to_owned(),
            label: Some("todo".to_owned()),
        };
        let record = TextNoteRecord::from(&note);
        assert_eq!(TextNote::from(record), note);
    }

    #[test]
    fn text_note_label_defaults_to_absent() {
        let record: TextNoteRecord =
            serde_json::from_str(r#"{"x": 1.0, "y": 2.0, "text": "hi"}"#).expect("decodes");
        assert_eq!(record.label, None);
    }

    #[test]
    fn audio_note_round_trip() {
        let note = AudioNote {
            anchor: Point::new(5.0, 6.0),
            file_path: "audio/lecture-3.m4a".to_owned(),
            duration_ms: 12_500,
            label: None,
        };
        let record = AudioNoteRecord::from(&note);
        assert_eq!(AudioNote::from(record), note);
    }

    #[test]
    fn audio_note_accepts_legacy_field_names() {
        let legacy: AudioNoteRecord =
            serde_json::from_str(r#"{"x": 1.0, "y": 2.0, "file": "a.m4a", "dur": 900}"#)
                .expect("decodes");
        let current: AudioNoteRecord =
            serde_json::from_str(r#"{"x": 1.0, "y": 2.0, "filePath": "a.m4a", "durationMs": 900}"#)
                .expect("decodes");
        assert_eq!(legacy, current);
    }

    #[test]
    fn audio_note_duration_defaults_to_zero() {
        let record: AudioNoteRecord =
            serde_json::from_str(r#"{"x": 0.0, "y": 0.0, "filePath": "a.m4a"}"#).expect("decodes");
        assert_eq!(record.duration_ms, 0);
    }

    #[test]
    fn image_note_round_trip() {
        let note = ImageNote {
            anchor: Point::new(7.0, 8.0),
            file_path: "images/sketch.png".to_owned(),
            width: 120.0,
            height: 80.0,
            rotation: 0.75,
        };
        let record = ImageNoteRecord::from(&note);
        assert_eq!(ImageNote::from(record), note);
    }

    #[test]
    fn image_note_rotation_defaults_to_zero() {
        let record: ImageNoteRecord = serde_json::from_str(
            r#"{"x": 0.0, "y": 0.0, "filePath": "p.png", "width": 10.0, "height": 10.0}"#,
        )
        .expect("decodes");
        assert_eq!(record.rotation, 0.0);
    }
}
