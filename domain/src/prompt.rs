//! Prompt construction for meeting summaries.

use crate::meeting::MeetingDetails;

/// Label that opens every generated prompt.
pub const TRANSCRIPTION_HEADER: &str = "Meeting Transcription:";

/// Renders a meeting transcript into the single prompt sent to the completion provider.
///
/// The first line is the header followed by the meeting title. Each entry then takes two
/// lines, the quoted speaker and timestamp followed by the quoted content, in the same
/// order as `details.entries`.
pub fn format_transcription(details: &MeetingDetails) -> String {
    let header = format!("{TRANSCRIPTION_HEADER} {}\n", details.meeting_title);

    details.entries.iter().fold(header, |mut prompt, entry| {
        prompt.push_str(&format!(
            "\"{}\",\"{}\"\n\"{}\"\n",
            entry.speaker, entry.timestamp, entry.content
        ));
        prompt
    })
}
