#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};

use periodical_engine::{CachedResponse, FailureKind, FetchError, Transport, Url};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(periodical_logging::initialize_for_tests);
}

/// In-memory transport that records every URL it is asked for.
#[derive(Clone, Default)]
pub struct FakeTransport {
    responses: Arc<Mutex<HashMap<String, (u16, String, Vec<u8>)>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, status: u16, content_type: &str, body: impl Into<Vec<u8>>) {
        self.responses.lock().unwrap().insert(
            url.to_string(),
            (status, content_type.to_string(), body.into()),
        );
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| u.as_str() == url).count()
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &Url) -> Result<CachedResponse, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let responses = self.responses.lock().unwrap();
        let (status, content_type, body) = responses
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::new(FailureKind::Network, format!("no route to {url}")))?;
        Ok(CachedResponse {
            url: url.to_string(),
            status,
            headers: vec![("Content-Type".to_string(), content_type)],
            body,
        })
    }
}

/// A small PNG of the given size, encoded in memory.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}
