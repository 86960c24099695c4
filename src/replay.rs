//! Landmark frame sources.
//!
//! The live detector is outside this crate; a [`LandmarkSource`] stands in
//! for it and delivers frames serially. [`JsonLinesReplay`] reads recorded
//! detector output, one JSON object per line:
//!
//! ```text
//! {"faces": [[{"x": 0.51, "y": 0.42, "z": -0.01}, ...]]}
//! {"faces": []}
//! ```
//!
//! An empty `faces` list is a frame without a face. Only the first face of a
//! frame is used.

use crate::{
    landmarks::{LandmarkPoint, LandmarkSet},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// One delivered frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    /// Frame number, 0-based
    pub index: usize,
    /// First detected face, if any
    pub face: Option<LandmarkSet>,
}

/// Serial supplier of landmark frames
pub trait LandmarkSource {
    /// Next frame, or `None` once the stream has ended
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails or yields a frame that
    /// cannot be decoded.
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// Serialized form of a frame in a replay file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayFrame {
    /// Detected faces in detector order
    #[serde(default)]
    pub faces: Vec<Vec<LandmarkPoint>>,
}

impl ReplayFrame {
    /// Encode a frame with at most one face
    #[must_use]
    pub fn from_face(face: Option<&LandmarkSet>) -> Self {
        Self {
            faces: face.map(|f| vec![f.points().to_vec()]).unwrap_or_default(),
        }
    }
}

/// JSON-Lines replay of recorded detector output
pub struct JsonLinesReplay<R: BufRead> {
    lines: Lines<R>,
    line_number: usize,
    frame_index: usize,
}

impl JsonLinesReplay<BufReader<File>> {
    /// Open a replay file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        log::info!("Opening landmark replay: {}", path.as_ref().display());
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesReplay<R> {
    /// Read frames from any buffered reader
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            frame_index: 0,
        }
    }
}

impl<R: BufRead> LandmarkSource for JsonLinesReplay<R> {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let frame: ReplayFrame = serde_json::from_str(trimmed).map_err(|e| {
                Error::ReplayFormat(format!("line {}: {e}", self.line_number))
            })?;

            let index = self.frame_index;
            self.frame_index += 1;

            if frame.faces.len() > 1 {
                log::debug!("Frame {index} has {} faces, using the first", frame.faces.len());
            }

            return Ok(Some(Frame {
                index,
                face: LandmarkSet::first_face(&frame.faces),
            }));
        }

        Ok(None)
    }
}

/// In-memory frame queue
#[derive(Debug, Clone, Default)]
pub struct FrameQueue {
    frames: VecDeque<Option<LandmarkSet>>,
    next_index: usize,
}

impl FrameQueue {
    /// Queue the given frames in order
    #[must_use]
    pub fn new(frames: impl IntoIterator<Item = Option<LandmarkSet>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            next_index: 0,
        }
    }

    /// Append a frame
    pub fn push(&mut self, face: Option<LandmarkSet>) {
        self.frames.push_back(face);
    }

    /// Frames still queued
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkSource for FrameQueue {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        Ok(self.frames.pop_front().map(|face| {
            let index = self.next_index;
            self.next_index += 1;
            Frame { index, face }
        }))
    }
}
