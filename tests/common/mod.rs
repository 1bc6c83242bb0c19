//! Shared fixtures: synthetic images, a scripted model, and a local stand-in
//! for the plant identification API.

#![allow(dead_code)]

use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use leafcheck::classifier::{ClassificationResult, ClassifyError, ModelDescriptor, Prediction};
use leafcheck::identify::{IdentifyOutcome, PlantIdentifier};
use leafcheck::{AppContext, ImageModel, PlantClassifier, PlantVocabulary};
use tiny_http::{Header, Response, Server, StatusCode};

pub fn png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
        .write_to(&mut buf, ImageOutputFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Returns the same ranking for every image.
pub struct ScriptedModel(pub Vec<(&'static str, f64)>);

impl ImageModel for ScriptedModel {
    fn classify(&self, _image: &DynamicImage, top_k: usize) -> Result<ClassificationResult, ClassifyError> {
        Ok(ClassificationResult::from_ranked(
            self.0.iter().take(top_k).map(|(l, p)| Prediction::new(*l, *p)).collect(),
        ))
    }

    fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor {
            name: "Scripted".into(),
            input_width: 300,
            input_height: 300,
            pretrained_on: "fixtures".into(),
            classes: self.0.len(),
        }
    }
}

/// Identifier that counts calls and returns a fixed outcome.
pub struct CountingIdentifier {
    pub calls: AtomicUsize,
    pub outcome: IdentifyOutcome,
}

impl CountingIdentifier {
    pub fn new(outcome: IdentifyOutcome) -> Arc<Self> {
        Arc::new(CountingIdentifier { calls: AtomicUsize::new(0), outcome })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PlantIdentifier for CountingIdentifier {
    fn identify(&self, _image_bytes: &[u8]) -> IdentifyOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

pub fn context(
    ranking: Vec<(&'static str, f64)>,
    identifier: Arc<dyn PlantIdentifier>,
    upload_dir: &std::path::Path,
) -> AppContext {
    let classifier = PlantClassifier::new(
        Arc::new(ScriptedModel(ranking)),
        Arc::new(PlantVocabulary::default()),
    );
    AppContext::new(classifier, identifier, upload_dir)
}

/// A request captured by `MockApi`.
#[derive(Debug, Clone)]
pub struct Captured {
    pub body: String,
    pub api_key: Option<String>,
}

/// Local HTTP server answering every request with a scripted reply.
pub struct MockApi {
    pub url: String,
    pub requests: Arc<Mutex<Vec<Captured>>>,
}

impl MockApi {
    pub fn start(status: u16, body: &str, delay: Duration) -> MockApi {
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let body = body.to_owned();

        std::thread::spawn(move || {
            for mut request in server.incoming_requests() {
                let mut text = String::new();
                let _ = request.as_reader().read_to_string(&mut text);
                let api_key = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Api-Key"))
                    .map(|h| h.value.as_str().to_owned());
                seen.lock().unwrap().push(Captured { body: text, api_key });

                std::thread::sleep(delay);
                let response = Response::from_string(body.clone())
                    .with_status_code(StatusCode(status))
                    .with_header(Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap());
                let _ = request.respond(response);
            }
        });

        MockApi { url: format!("http://127.0.0.1:{}/v2/identify", port), requests }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}
