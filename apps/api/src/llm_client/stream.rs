//! Lazy decoding of newline-delimited JSON generation output.

use bytes::{Bytes, BytesMut};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use tracing::debug;

use crate::llm_client::LlmError;

/// One line of inference output: an incremental text piece plus a completion flag.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Fragment {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
    /// Set when the backend aborts mid-stream.
    #[serde(default)]
    pub error: Option<String>,
}

/// Turns a byte stream into parsed fragments, one per non-blank line.
///
/// Lines may span chunk boundaries. A trailing line without a newline is parsed
/// once the byte stream ends. Lines that are not valid fragments are skipped.
pub fn ndjson_fragments<S, E>(bytes: S) -> impl Stream<Item = Result<Fragment, E>>
where
    S: Stream<Item = Result<Bytes, E>>,
{
    let state = (Box::pin(bytes), BytesMut::new(), false);

    stream::unfold(state, |(mut bytes, mut buffer, mut exhausted)| async move {
        loop {
            while let Some(line) = next_line(&mut buffer, exhausted) {
                if let Some(fragment) = parse_line(&line) {
                    return Some((Ok(fragment), (bytes, buffer, exhausted)));
                }
            }
            if exhausted {
                return None;
            }
            match bytes.next().await {
                Some(Ok(chunk)) => buffer.extend_from_slice(&chunk),
                Some(Err(e)) => {
                    buffer.clear();
                    return Some((Err(e), (bytes, buffer, true)));
                }
                None => exhausted = true,
            }
        }
    })
}

/// Concatenates fragment text in arrival order until a fragment reports `done`
/// or the stream ends.
pub async fn collect_response<S, E>(fragments: S) -> Result<String, LlmError>
where
    S: Stream<Item = Result<Fragment, E>>,
    E: std::fmt::Display,
{
    futures::pin_mut!(fragments);

    let mut text = String::new();
    while let Some(fragment) = fragments.next().await {
        let fragment = fragment.map_err(|e| LlmError::Stream(e.to_string()))?;
        if let Some(message) = fragment.error {
            return Err(LlmError::Backend(message));
        }
        text.push_str(&fragment.response);
        if fragment.done {
            break;
        }
    }
    Ok(text)
}

fn next_line(buffer: &mut BytesMut, exhausted: bool) -> Option<BytesMut> {
    if let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
        let mut line = buffer.split_to(pos + 1);
        line.truncate(pos);
        return Some(line);
    }
    if exhausted && !buffer.is_empty() {
        return Some(buffer.split());
    }
    None
}

fn parse_line(line: &[u8]) -> Option<Fragment> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_slice(line) {
        Ok(fragment) => Some(fragment),
        Err(e) => {
            debug!(
                "Skipping malformed generation line ({e}): {}",
                String::from_utf8_lossy(line)
            );
            None
        }
    }
}
