//! Server-rendered pages.
//!
//! Markup is assembled with `format!`; every dynamic value goes through
//! [`escape_html`] before it is written into the page.

use crate::application::gallery::dto::UploadReport;
use std::fmt::Write;

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;background:#f4f4f5;color:#18181b}\
header{background:#18181b;color:#fafafa;padding:1rem 2rem}\
main{padding:1.5rem 2rem}\
.toolbar{display:flex;gap:1rem;align-items:center;flex-wrap:wrap;margin-bottom:1.5rem}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(220px,1fr));gap:1rem}\
figure{margin:0;background:#fff;border-radius:6px;overflow:hidden;box-shadow:0 1px 3px #0002}\
figure img{width:100%;height:180px;object-fit:cover;display:block}\
figcaption{padding:.5rem;display:flex;justify-content:flex-end}\
button{cursor:pointer}\
.danger{background:#b91c1c;color:#fff;border:0;padding:.4rem .8rem;border-radius:4px}\
.empty{color:#71717a}\
pre{background:#27272a;color:#e4e4e7;padding:1rem;overflow-x:auto}";

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <header><h1>{title}</h1></header>\n<main>\n{body}</main>\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

/// Gallery page: upload form, one tile per image with its delete button,
/// and the delete-all button.
pub fn gallery_page(images: &[String]) -> String {
    let mut body = String::from(
        "<section class=\"toolbar\">\n\
         <form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"files\" accept=\"image/*\" multiple>\n\
         <button type=\"submit\">Upload</button>\n</form>\n",
    );

    if !images.is_empty() {
        body.push_str(
            "<form action=\"/deleteAll\" method=\"post\">\n\
             <button class=\"danger\" type=\"submit\">Delete all</button>\n</form>\n",
        );
    }
    body.push_str("</section>\n");

    if images.is_empty() {
        body.push_str("<p class=\"empty\">No images yet. Upload one to get started.</p>\n");
        return layout("Image Gallery", &body);
    }

    body.push_str("<section class=\"grid\">\n");
    for uri in images {
        let uri = escape_html(uri);
        let _ = write!(
            body,
            "<figure>\n<a href=\"{uri}\"><img src=\"{uri}\" alt=\"\" loading=\"lazy\"></a>\n\
             <figcaption><form action=\"/delete\" method=\"post\">\
             <input type=\"hidden\" name=\"name\" value=\"{uri}\">\
             <button class=\"danger\" type=\"submit\">Delete</button></form></figcaption>\n\
             </figure>\n"
        );
    }
    body.push_str("</section>\n");

    layout("Image Gallery", &body)
}

/// The single error page shown for every failed gallery operation.
pub fn error_page(message: &str, trace: &[String]) -> String {
    let mut body = format!(
        "<p><strong>{}</strong></p>\n",
        escape_html(message)
    );
    push_trace(&mut body, trace);
    body.push_str("<p><a href=\"/\">Back to the gallery</a></p>\n");
    layout("Something went wrong", &body)
}

/// Error page for an upload batch in which some files failed.
pub fn upload_failed_page(report: &UploadReport) -> String {
    let mut body = format!(
        "<p><strong>{} of {} files could not be uploaded.</strong></p>\n",
        report.failed.len(),
        report.attempted()
    );

    if !report.stored.is_empty() {
        body.push_str("<h2>Stored</h2>\n<ul>\n");
        for stored in &report.stored {
            let _ = writeln!(
                body,
                "<li>{} as <a href=\"{}\">{}</a></li>",
                escape_html(&stored.original_name),
                escape_html(&stored.uri),
                escape_html(&stored.blob_name)
            );
        }
        body.push_str("</ul>\n");
    }

    body.push_str("<h2>Failed</h2>\n<ul>\n");
    for failed in &report.failed {
        let _ = writeln!(
            body,
            "<li>{}: {}</li>",
            escape_html(&failed.original_name),
            escape_html(&failed.error)
        );
    }
    body.push_str("</ul>\n");

    if let Some(first) = report.failed.first() {
        push_trace(&mut body, first.cause.trace());
    }
    body.push_str("<p><a href=\"/\">Back to the gallery</a></p>\n");
    layout("Upload failed", &body)
}

fn push_trace(body: &mut String, trace: &[String]) {
    if trace.is_empty() {
        return;
    }
    body.push_str("<details open>\n<summary>Trace</summary>\n<pre>");
    for (depth, cause) in trace.iter().enumerate() {
        let _ = writeln!(body, "{depth}: {}", escape_html(cause));
    }
    body.push_str("</pre>\n</details>\n");
}
