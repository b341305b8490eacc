use crate::domain::response::Response;
use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use std::io::Write;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
enum Body<'a> {
    Success { value: &'a Value },
    Error { code: &'a str, message: &'a str },
    NotImplemented,
}

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a Value>,
    #[serde(flatten)]
    body: Body<'a>,
}

/// Writes one JSON object per response and flushes after each.
pub struct ResponseWriter<W: Write> {
    sink: W,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write_response(&mut self, id: Option<&Value>, response: &Response) -> Result<()> {
        let body = match response {
            Response::Success(value) => Body::Success { value },
            Response::Error { code, message } => Body::Error { code, message },
            Response::NotImplemented => Body::NotImplemented,
        };
        serde_json::to_writer(&mut self.sink, &Envelope { id, body })?;
        self.sink.write_all(b"\n")?;
        self.sink.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
