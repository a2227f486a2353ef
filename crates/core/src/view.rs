use crate::session::Session;
use crate::{MapPlace, SearchOutcome, SearchResult};

pub const WELCOME_TITLE: &str = "Find the Perfect DJ";
pub const NO_PLACES_MESSAGE: &str =
    "The AI assistant provided advice, but no specific map locations were found for this query.";
pub const SEARCHING_MESSAGE: &str = "Searching...";

pub fn render(session: &Session) -> String {
    let mut out = String::new();

    if let Some(banner) = session.location_banner() {
        out.push_str(&format!("[location] {banner}\n\n"));
    }
    if let Some(notice) = session.notice() {
        out.push_str(&format!("! {notice}\n\n"));
    }

    match session.outcome() {
        SearchOutcome::Loading => out.push_str(&format!("{SEARCHING_MESSAGE}\n")),
        SearchOutcome::Failed(message) => out.push_str(&format!("error: {message}\n")),
        SearchOutcome::Succeeded(result) => out.push_str(&render_result(result)),
        SearchOutcome::Empty => out.push_str(&render_welcome()),
    }

    out
}

fn render_result(result: &SearchResult) -> String {
    let mut out = format!(
        "== AI Chat Assistant ==\n{}\n\n== DJs Near You ==\n",
        result.answer_text.trim_end()
    );

    if result.places.is_empty() {
        out.push_str(NO_PLACES_MESSAGE);
        out.push('\n');
        return out;
    }

    for (index, place) in result.places.iter().enumerate() {
        out.push_str(&render_place(index + 1, place));
    }
    out
}

fn render_place(number: usize, place: &MapPlace) -> String {
    let mut out = format!("{number}. {}\n   {}\n", place.title, place.uri);
    for snippet in place.display_snippets() {
        if snippet.author.is_empty() {
            out.push_str(&format!("   \"{}\"\n", snippet.text.trim()));
        } else {
            out.push_str(&format!("   \"{}\" - {}\n", snippet.text.trim(), snippet.author));
        }
    }
    out
}

fn render_welcome() -> String {
    format!(
        "{WELCOME_TITLE}\n\
         Tell us the vibe, event type, or music genre. Our AI will find the best match near you!\n\
         (e.g., \"techno DJ for a warehouse party\" or \"a wedding DJ who plays 90s hip-hop\")\n"
    )
}
