use serde::{Deserialize, Serialize};
use std::io;

use crate::error::{DedocError, Result};

/// Axis-aligned box in page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BBox {
    pub x_top_left: u32,
    pub y_top_left: u32,
    pub width: u32,
    pub height: u32,
}

/// Relative encoding stored in a `"bounding box"` annotation value.
///
/// Field order is part of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativeBBox {
    pub x_top_left: f64,
    pub y_top_left: f64,
    pub width: f64,
    pub height: f64,
    pub page_width: u32,
    pub page_height: u32,
}

impl BBox {
    pub fn new(x_top_left: u32, y_top_left: u32, width: u32, height: u32) -> Self {
        Self {
            x_top_left,
            y_top_left,
            width,
            height,
        }
    }

    /// Builds a box from its top-left and bottom-right corners.
    pub fn from_two_points(top_left: (u32, u32), bottom_right: (u32, u32)) -> Self {
        let (x_top_left, y_top_left) = top_left;
        let (x_bottom_right, y_bottom_right) = bottom_right;
        Self::new(
            x_top_left,
            y_top_left,
            x_bottom_right.saturating_sub(x_top_left),
            y_bottom_right.saturating_sub(y_top_left),
        )
    }

    #[must_use]
    pub fn x_bottom_right(&self) -> u32 {
        self.x_top_left.saturating_add(self.width)
    }

    #[must_use]
    pub fn y_bottom_right(&self) -> u32 {
        self.y_top_left.saturating_add(self.height)
    }

    pub fn to_relative(&self, page_width: u32, page_height: u32) -> Result<RelativeBBox> {
        if page_width == 0 || page_height == 0 {
            return Err(DedocError::annotation(
                "bounding box",
                format!("page size must be positive, got {page_width}x{page_height}"),
            ));
        }
        let (page_w, page_h) = (f64::from(page_width), f64::from(page_height));
        Ok(RelativeBBox {
            x_top_left: f64::from(self.x_top_left) / page_w,
            y_top_left: f64::from(self.y_top_left) / page_h,
            width: f64::from(self.width) / page_w,
            height: f64::from(self.height) / page_h,
            page_width,
            page_height,
        })
    }

    /// The JSON string carried by a bounding box annotation.
    pub fn to_relative_json(&self, page_width: u32, page_height: u32) -> Result<String> {
        to_wire_json(&self.to_relative(page_width, page_height)?)
    }

    /// Decodes an annotation value back to pixels, truncating like the encoder's consumers do.
    pub fn from_relative_json(value: &str) -> Result<Self> {
        let relative: RelativeBBox = serde_json::from_str(value)?;
        Ok(relative.to_absolute())
    }
}

impl RelativeBBox {
    pub fn to_absolute(&self) -> BBox {
        let (page_w, page_h) = (f64::from(self.page_width), f64::from(self.page_height));
        BBox::new(
            (self.x_top_left * page_w) as u32,
            (self.y_top_left * page_h) as u32,
            (self.width * page_w) as u32,
            (self.height * page_h) as u32,
        )
    }
}

/// Serializes with `", "` and `": "` separators, the layout downstream parsers expect.
pub(crate) fn to_wire_json<T: Serialize>(value: &T) -> Result<String> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever writes UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}
