use tracing::debug;

use crate::core::error::ExtractionError;

pub const START_MARKER: &str = "##start response##";
pub const END_MARKER: &str = "##end response##";

/// Returns the trimmed text between the last start marker and the last end
/// marker of a raw model response.
///
/// Models often restate the prompt (markers included) before answering, so
/// only the final block counts. Markers are not paired: when the last end
/// marker precedes the last start marker the result is empty.
pub fn extract(raw: &str) -> Result<String, ExtractionError> {
    let last_start = raw
        .rmatch_indices(START_MARKER)
        .next()
        .map(|(index, _)| index + START_MARKER.len())
        .ok_or(ExtractionError::MissingStartMarker {
            marker: START_MARKER,
        })?;
    let last_end = raw
        .rmatch_indices(END_MARKER)
        .next()
        .map(|(index, _)| index)
        .ok_or(ExtractionError::MissingEndMarker { marker: END_MARKER })?;

    let extracted = raw
        .get(last_start..last_end)
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    debug!(extracted = %extracted, "extracted answer block");
    Ok(extracted)
}

/// Marker lines every generation prompt must carry, with a placeholder
/// between them.
pub fn answer_block_instructions(placeholder: &str) -> String {
    format!("{START_MARKER}\n{placeholder}\n{END_MARKER}")
}

#[cfg(test)]
mod tests;
