use chrono::{DateTime, Utc};

/// Intrinsic pixel dimensions of a photo, carried for aspect-ratio layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoSize {
    pub width: u32,
    pub height: u32,
}

impl PhotoSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height, or `None` for degenerate sizes.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height == 0 {
            return None;
        }
        Some(f64::from(self.width) / f64::from(self.height))
    }
}

/// One feed entry.
///
/// `id` is the primary key and is stable across fetches. `is_liked` is the
/// only field mutated after creation; everything else is fixed at decode
/// time.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: String,
    pub size: PhotoSize,
    pub created_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub thumb_url: String,
    pub full_url: String,
    pub is_liked: bool,
}
