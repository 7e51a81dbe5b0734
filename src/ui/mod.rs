//! Server-rendered chat page
//!
//! Pure rendering of a conversation snapshot. Forms post back to the routes in
//! `crate::routes`, which redirect here again.

use chrono::Local;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::config::InterfaceConfig;
use crate::conversation::{Role, Turn};
use crate::core::{ConversationSnapshot, Notification};

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #fafafa; color: #1a1a1a; }
.header { position: sticky; top: 0; display: flex; justify-content: space-between; align-items: center; padding: 12px 16px; border-bottom: 1px solid #e4e4e7; background: rgba(255,255,255,.85); }
.header h1 { margin: 0; font-size: 1.1rem; }
.header p { margin: 0; font-size: .75rem; color: #71717a; }
main { max-width: 56rem; margin: 0 auto; display: flex; flex-direction: column; min-height: calc(100vh - 60px); }
.toolbar { padding: 12px 16px; border-bottom: 1px solid #e4e4e7; }
.toggle { border: 1px solid #d4d4d8; background: #fff; border-radius: 6px; padding: 6px 12px; cursor: pointer; }
.toggle.active { background: #6d28d9; color: #fff; border-color: #6d28d9; }
.messages { flex: 1; padding: 24px 16px; display: flex; flex-direction: column; gap: 24px; }
.welcome { text-align: center; margin: auto; max-width: 28rem; color: #52525b; }
.turn { max-width: 80%; padding: 12px 16px; border-radius: 12px; white-space: pre-wrap; word-break: break-word; }
.turn.user { align-self: flex-end; background: #6d28d9; color: #fff; }
.turn.assistant { align-self: flex-start; background: #fff; border: 1px solid #e4e4e7; }
.badge { font-size: .75rem; opacity: .7; margin-bottom: 8px; }
.time { font-size: .75rem; opacity: .6; margin-top: 8px; }
.turn.user .time { text-align: right; }
.thinking { align-self: flex-start; color: #71717a; font-size: .875rem; }
.notice { margin: 12px 16px 0; padding: 12px 16px; border-radius: 8px; background: #fee2e2; color: #991b1b; display: flex; justify-content: space-between; gap: 12px; }
.composer { display: flex; gap: 12px; align-items: flex-end; padding: 16px; border-top: 1px solid #e4e4e7; }
.composer textarea { flex: 1; min-height: 3rem; max-height: 8rem; resize: vertical; padding: 10px; border-radius: 12px; border: 1px solid #d4d4d8; }
.composer button { height: 3rem; padding: 0 16px; border-radius: 12px; border: none; background: #6d28d9; color: #fff; }
.composer :disabled { opacity: .5; cursor: not-allowed; }
.hint { text-align: center; font-size: .75rem; color: #71717a; margin: 0 0 12px; }
"#;

/// Render the full chat page
pub fn render_page(interface: &InterfaceConfig, view: &ConversationSnapshot) -> String {
    let mut page = String::with_capacity(4096);

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    if view.busy {
        // Pick up the reply once it lands.
        page.push_str("<meta http-equiv=\"refresh\" content=\"2\">\n");
    }
    page.push_str(&format!(
        "<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n",
        text(&interface.header.title),
        STYLE
    ));

    page.push_str(&render_header(interface));
    page.push_str("<main>\n");
    page.push_str(&render_toggle(view.web_search_enabled));

    for notification in &view.notifications {
        page.push_str(&render_notification(notification));
    }

    page.push_str("<section class=\"messages\">\n");
    if view.turns.is_empty() && !view.busy {
        page.push_str(&format!(
            "<div class=\"welcome\"><h2>{}</h2><p>{}</p></div>\n",
            text(&interface.welcome.heading),
            text(&interface.welcome.body)
        ));
    } else {
        for turn in &view.turns {
            page.push_str(&render_turn(turn));
        }
        if view.busy {
            page.push_str(&format!(
                "<div class=\"thinking\">{} is thinking...</div>\n",
                text(&interface.assistant.name)
            ));
        }
    }
    page.push_str("</section>\n");

    page.push_str(&render_composer(interface, view));
    page.push_str("</main>\n</body>\n</html>\n");

    page
}

fn render_header(interface: &InterfaceConfig) -> String {
    let link = interface
        .header
        .github_url
        .as_deref()
        .map(|url| format!("<a href=\"{}\">GitHub</a>", attr(url)))
        .unwrap_or_default();

    format!(
        "<header class=\"header\"><div><h1>{}</h1><p>{}</p></div>{}</header>\n",
        text(&interface.header.title),
        text(&interface.header.subtitle),
        link
    )
}

fn render_toggle(enabled: bool) -> String {
    format!(
        "<div class=\"toolbar\"><form method=\"post\" action=\"/web-search\">\
         <button type=\"submit\" class=\"toggle{}\" aria-pressed=\"{}\">Web Search{}</button>\
         </form></div>\n",
        if enabled { " active" } else { "" },
        enabled,
        if enabled { " \u{2728}" } else { "" }
    )
}

fn render_notification(notification: &Notification) -> String {
    format!(
        "<div class=\"notice\" role=\"alert\"><div><strong>{}</strong><div>{}</div></div>\
         <form method=\"post\" action=\"/notifications/{}/dismiss\">\
         <button type=\"submit\" aria-label=\"Dismiss\">\u{00d7}</button></form></div>\n",
        text(&notification.title),
        text(&notification.body),
        notification.id
    )
}

fn render_turn(turn: &Turn) -> String {
    let class = match turn.role() {
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    let badge = if turn.used_web_search() == Some(true) {
        "<div class=\"badge\">Web search enabled</div>"
    } else {
        ""
    };

    format!(
        "<div class=\"turn {}\" id=\"{}\">{}<div class=\"content\">{}</div><div class=\"time\">{}</div></div>\n",
        class,
        turn.id(),
        badge,
        text(turn.content()),
        turn.created_at().with_timezone(&Local).format("%H:%M")
    )
}

fn render_composer(interface: &InterfaceConfig, view: &ConversationSnapshot) -> String {
    let disabled = if view.busy { " disabled" } else { "" };

    format!(
        "<form class=\"composer\" method=\"post\" action=\"/send\">\
         <textarea name=\"message\" placeholder=\"{}\"{}>{}</textarea>\
         <button type=\"submit\"{}>Send</button></form>\n<p class=\"hint\">{}</p>\n",
        attr(&interface.input.placeholder),
        disabled,
        text(&view.draft),
        disabled,
        text(&interface.input.hint)
    )
}
