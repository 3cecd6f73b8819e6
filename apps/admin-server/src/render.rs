//! HTML rendering for the URL creator admin page.

use domain::{AdminPage, CampaignFields, DestinationCandidate, Field, MissingField, ValidationResult};
use http_common::html_escape;

const GOOGLE_HELP_URL: &str = "https://support.google.com/analytics/answer/1033867?hl=en";
const ANALYTICS_URL: &str = "https://analytics.google.com/";

/// Everything one render needs. `result` is `None` before the first submit.
pub struct PageView<'a> {
    pub page: &'a AdminPage,
    pub fields: &'a CampaignFields,
    pub candidates: &'a [DestinationCandidate],
    pub result: Option<&'a ValidationResult>,
}

pub fn render_page(view: &PageView<'_>) -> String {
    let notice_html = match view.result {
        Some(Err(missing)) => {
            let items: String = missing
                .iter()
                .map(|m| format!("<li>{}</li>", html_escape(&m.message())))
                .collect();
            format!(r#"<div class="notice notice-error"><ul>{}</ul></div>"#, items)
        }
        _ => String::new(),
    };

    let url_html = match view.result {
        Some(Ok(url)) => format!(r#"<p><code id="campaign-url">{}</code></p>"#, html_escape(url.as_str())),
        _ => String::new(),
    };

    let missing = match view.result {
        Some(Err(missing)) => Some(missing),
        _ => None,
    };
    let rows: String = Field::ALL
        .into_iter()
        .map(|f| {
            let invalid = missing.is_some_and(|m| {
                MissingField::ORDER
                    .iter()
                    .any(|mf| mf.field() == f && m.contains(*mf))
            });
            render_field_row(f, view.fields.get(f), invalid)
        })
        .collect();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        code {{ font-size: 2em; line-height: 1.5em; word-break: break-all; }}
        .notice-error {{ border-left: 4px solid #d63638; padding: 4px 12px; }}
        .form-invalid input {{ border-color: #d63638; }}
        .notes {{ border-left: 4px solid #00a32a; padding: 4px 12px; }}
    </style>
</head>
<body>
<div class="wrap">
    <h2>Generate a custom campaign URL</h2>
    {notice}
    <form action="{action}" id="campaign-url-form" method="post">
        <table class="form-table">
            <tbody>
                <tr valign="top">
                    <th scope="row"><label for="select-page">Destination page</label></th>
                    <td>{select}</td>
                </tr>
{rows}            </tbody>
        </table>
        <p class="submit">
            <input class="button-primary button" type="submit" value="Generate" name="submit" id="submit" />
        </p>
    </form>
    {url}
    <p>For more information visit <a href="{help}">Google's URL builder page</a>.</p>
    <div class="notes">
        <h3>Notes</h3>
        <ul>
            <li>None of this works without Source, Medium and Name</li>
            <li>You can view the results of your campaign under Reporting &gt; Acquisition &gt; Campaigns in <a href="{analytics}">Google Analytics</a></li>
        </ul>
    </div>
</div>
</body>
</html>"##,
        title = html_escape(view.page.page_title),
        notice = notice_html,
        action = html_escape(&view.page.path()),
        select = render_select(view.candidates, &view.fields.destination_url),
        rows = rows,
        url = url_html,
        help = GOOGLE_HELP_URL,
        analytics = ANALYTICS_URL,
    )
}

fn render_field_row(field: Field, value: &str, invalid: bool) -> String {
    let (marker, class) = if field.is_required() {
        (" *", "txt requiredField")
    } else {
        ("", "txt")
    };
    let row_class = if invalid { "form-invalid" } else { "" };
    format!(
        r#"                <tr valign="top" class="{row_class}">
                    <th scope="row"><label for="{key}">{label}{marker}</label></th>
                    <td>
                        <input type="text" name="{key}" id="{key}" value="{value}" class="{class}" /><br/>
                        {hint}
                    </td>
                </tr>
"#,
        key = field.key(),
        label = field.label(),
        marker = marker,
        value = html_escape(value),
        class = class,
        hint = html_escape(field.hint()),
        row_class = row_class,
    )
}

fn render_select(candidates: &[DestinationCandidate], selected: &str) -> String {
    let mut out = String::from(r#"<select name="select-page" id="select-page">"#);
    // Keep a destination that is not offered so the next submit sends it again.
    if !candidates.iter().any(|c| c.url == selected) {
        out.push_str(&format!(
            r#"<option value="{url}" selected>{url}</option>"#,
            url = html_escape(selected)
        ));
    }
    for c in candidates {
        let sel = if c.url == selected { " selected" } else { "" };
        out.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            html_escape(&c.url),
            sel,
            html_escape(&c.title)
        ));
    }
    out.push_str("</select>");
    out
}
