//! Scripted transport for driving stores in tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::api::Transport;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One recorded transport call.
#[derive(Debug, Clone)]
pub struct Call {
    pub method: Method,
    pub action: String,
    pub params: Vec<(String, String)>,
    pub body: Value,
}

struct Scripted {
    delay: Duration,
    result: Result<Value>,
}

/// Replays queued responses per action and records every call.
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, action: &str, delay: Duration, result: Result<Value>) {
        self.responses
            .lock()
            .unwrap()
            .entry(action.to_string())
            .or_default()
            .push_back(Scripted { delay, result });
    }

    pub fn respond_ok(&self, action: &str, value: Value) {
        self.push(action, Duration::ZERO, Ok(value));
    }

    pub fn respond_ok_after(&self, action: &str, delay: Duration, value: Value) {
        self.push(action, delay, Ok(value));
    }

    pub fn respond_err(&self, action: &str, error: AppError) {
        self.push(action, Duration::ZERO, Err(error));
    }

    pub fn respond_err_after(&self, action: &str, delay: Duration, error: AppError) {
        self.push(action, delay, Err(error));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, action: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.action == action)
            .collect()
    }

    async fn answer(&self, call: Call) -> Result<Value> {
        let action = call.action.clone();
        self.calls.lock().unwrap().push(call);

        let scripted = self
            .responses
            .lock()
            .unwrap()
            .get_mut(&action)
            .and_then(VecDeque::pop_front);
        match scripted {
            Some(Scripted { delay, result }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Err(AppError::invalid_body(action, "no scripted response")),
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, action: &str, params: &[(&str, &str)]) -> Result<Value> {
        self.answer(Call {
            method: Method::Get,
            action: action.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: Value::Null,
        })
        .await
    }

    async fn post(&self, action: &str, fields: Map<String, Value>) -> Result<Value> {
        self.answer(Call {
            method: Method::Post,
            action: action.to_string(),
            params: Vec::new(),
            body: Value::Object(fields),
        })
        .await
    }
}

// --- Fixtures ---

pub fn hero_json(title: &str) -> Value {
    json!({"title": title, "subtitle": "Masjid Al-Ikhlas", "description": "Pusat ibadah warga"})
}

pub fn countdown_json() -> Value {
    json!({"name": "Ramadhan 1448 H", "date": "2027-02-08T00:00:00", "active": true})
}

pub fn donation_json() -> Value {
    json!({
        "bankAccountNumber": "7001234567",
        "bankAccountName": "DKM Al-Ikhlas",
        "bankName": "BSI",
        "donationCollected": 25000000,
        "donationTarget": 100000000,
        "qrisImageUrl": "https://drive.example/qris.png"
    })
}

pub fn footer_json() -> Value {
    json!({
        "address": "Jl. Merdeka 1",
        "phone": "0812000000",
        "email": "dkm@example.org",
        "mapsUrl": "https://maps.example/masjid",
        "socials": [{"platform": "instagram", "url": "https://instagram.com/masjid"}]
    })
}

pub fn agenda_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "date": "2026-11-01",
        "time": "18:30 WIB",
        "location": "Ruang utama",
        "description": "",
        "category": "kajian"
    })
}

pub fn article_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "excerpt": "Ringkasan",
        "content": "<p>Isi</p>",
        "author": "Admin",
        "date": "2026-10-01",
        "image": "https://drive.example/cover.jpg",
        "category": "Kajian"
    })
}

pub fn gallery_json(id: &str) -> Value {
    json!({"id": id, "image": format!("https://drive.example/{id}.jpg"), "title": "Kerja bakti", "date": "2026-09-20"})
}

pub fn member_json(id: &str, name: &str) -> Value {
    json!({"id": id, "name": name, "title": "Ketua DKM", "image": "", "order": 1})
}

/// Full `getAll` payload with the given hero title.
pub fn site_json(hero_title: &str) -> Value {
    json!({
        "hero": hero_json(hero_title),
        "countdown": countdown_json(),
        "agenda": [agenda_json("a1", "Kajian Subuh")],
        "articles": [article_json("r1", "Keutamaan Sedekah")],
        "gallery": [gallery_json("g1")],
        "board": [member_json("m1", "H. Ahmad")],
        "donation": donation_json(),
        "footer": footer_json()
    })
}
