use super::types::TranscriptionRequest;

/// Build the `multipart/form-data` body for one transcription call.
///
/// Optional fields are only emitted when present; granularities are emitted
/// once each under the repeated `timestamp_granularities[]` name.
pub(crate) fn build_transcription_multipart(
    boundary: &str,
    request: &TranscriptionRequest<'_>,
    model: Option<&str>,
    mime_type: &str,
) -> Vec<u8> {
    let media = request.media;
    let mut body = Vec::with_capacity(media.data.len() + 1024);

    if let Some(model) = model {
        append_field(&mut body, boundary, "model", model);
    }
    if let Some(lang) = request.language.as_deref() {
        append_field(&mut body, boundary, "language", &lang.trim().to_ascii_lowercase());
    }
    if let Some(prompt) = request.prompt.as_deref() {
        append_field(&mut body, boundary, "prompt", prompt);
    }
    append_field(
        &mut body,
        boundary,
        "response_format",
        &request.response_format.to_string(),
    );
    if let Some(temperature) = request.temperature {
        append_field(&mut body, boundary, "temperature", &temperature.to_string());
    }
    for granularity in request.granularities() {
        append_field(
            &mut body,
            boundary,
            "timestamp_granularities[]",
            &granularity.to_string(),
        );
    }

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            escape_quoted(&media.file_name)
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {mime_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(&media.data);
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    body
}

fn append_field(body: &mut Vec<u8>, boundary: &str, name: &str, value: &str) {
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
    );
    body.extend_from_slice(value.as_bytes());
    body.extend_from_slice(b"\r\n");
}

fn escape_quoted(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .map(|c| if c == '"' { '\'' } else { c })
        .collect()
}
