//! HTML rendition of a [`ShellView`].
//!
//! Produces a self-contained fragment with inline styles so it can be
//! dropped into any page around the protected markup.

use indoc::formatdoc;

use super::view::{ActionButton, DebugOverlay, DetailPanel, LockoutModal, Notification, ShellView};

/// Render the shell around `content_html` (inserted verbatim).
pub fn render_html(view: &ShellView, content_html: &str) -> String {
    let notification = view
        .notification
        .as_ref()
        .map(render_notification)
        .unwrap_or_default();
    let modal = view.modal.as_ref().map(render_modal).unwrap_or_default();
    let debug = view.debug.as_ref().map(render_debug).unwrap_or_default();

    formatdoc! {r#"
        <div class="contract-guard" data-tier="{tier}">
        <div class="contract-guard__content" style="{style}"{inert}>
        {content_html}
        </div>
        {notification}{modal}{debug}</div>
        "#,
        tier = view.tier,
        content_html = content_html,
        notification = notification,
        modal = modal,
        debug = debug,
        style = escape(&view.content.style()),
        inert = if view.is_interactive() { "" } else { r#" inert aria-hidden="true""# },
    }
}

fn render_notification(notification: &Notification) -> String {
    let dismiss = if notification.dismissible {
        r#"<button type="button" data-action="dismiss" aria-label="Dismiss">&times;</button>"#
    } else {
        ""
    };
    formatdoc! {r#"
        <aside class="contract-guard__notification" data-tier="{tier}" role="status" style="position: fixed; top: 16px; right: 16px; z-index: 9998; max-width: 360px;">
        <strong>{title}</strong>{dismiss}
        <p>{message}</p>
        <details{open}>
        <summary>Details</summary>
        {details}</details>
        {actions}</aside>
        "#,
        tier = notification.tier,
        dismiss = dismiss,
        title = escape(&notification.title),
        message = escape(&notification.message),
        open = if notification.details_expanded { " open" } else { "" },
        details = render_details(&notification.details),
        actions = render_actions(&notification.actions),
    }
}

fn render_modal(modal: &LockoutModal) -> String {
    formatdoc! {r#"
        <div class="contract-guard__modal" role="alertdialog" aria-modal="true" style="position: fixed; inset: 0; z-index: 9999; display: flex; align-items: center; justify-content: center; background: rgba(0, 0, 0, 0.75);">
        <section>
        <h2>{title}</h2>
        <p>{message}</p>
        {details}<p class="contract-guard__notice">{notice}</p>
        {actions}</section>
        </div>
        "#,
        title = escape(&modal.title),
        message = escape(&modal.message),
        details = render_details(&modal.details),
        notice = escape(&modal.interaction_notice),
        actions = render_actions(&modal.actions),
    }
}

fn render_details(details: &DetailPanel) -> String {
    let mut rows = vec![
        ("Client", details.client_label.clone()),
        ("Project", details.project_label.clone()),
        ("Due date", details.due_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        ("Days late", details.days_late.to_string()),
        ("Hours late", details.hours_late.to_string()),
        ("Fade level", format!("{:.0}%", details.fade_level * 100.0)),
    ];
    if let Some(amount) = &details.amount {
        rows.push(("Amount", amount.clone()));
    }

    let mut out = String::from("<dl>\n");
    for (label, value) in rows {
        out.push_str(&format!("<dt>{label}</dt><dd>{}</dd>\n", escape(&value)));
    }
    out.push_str("</dl>\n");
    out
}

fn render_actions(actions: &[ActionButton]) -> String {
    if actions.is_empty() {
        return String::new();
    }
    let mut out = String::from("<div class=\"contract-guard__actions\">\n");
    for action in actions {
        let element = match &action.href {
            Some(href) => format!(
                "<a href=\"{}\" data-action=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>\n",
                escape(href),
                action.kind,
                escape(&action.label)
            ),
            None => format!(
                "<button type=\"button\" data-action=\"{}\">{}</button>\n",
                action.kind,
                escape(&action.label)
            ),
        };
        out.push_str(&element);
    }
    out.push_str("</div>\n");
    out
}

fn render_debug(debug: &DebugOverlay) -> String {
    let body: Vec<String> = debug
        .entries
        .iter()
        .map(|e| format!("{}: {}", escape(&e.key), escape(&e.value)))
        .collect();
    formatdoc! {r#"
        <pre class="contract-guard__debug" style="position: fixed; bottom: 8px; left: 8px; z-index: 10000; font-size: 11px; opacity: 0.8;">
        {body}
        </pre>
        "#,
        body = body.join("\n"),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
