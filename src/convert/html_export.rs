use crate::engine::markup::escape_html;

const STYLESHEET: &str = r#"
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
      line-height: 1.6;
      max-width: 800px;
      margin: 0 auto;
      padding: 20px;
      color: #333;
    }
    h1, h2, h3, h4, h5, h6 {
      color: #2563eb;
      margin-top: 24px;
      margin-bottom: 16px;
    }
    table {
      border-collapse: collapse;
      width: 100%;
      margin: 16px 0;
    }
    th, td {
      border: 1px solid #e5e7eb;
      padding: 8px 12px;
      text-align: left;
    }
    th {
      background-color: #f9fafb;
      font-weight: 600;
    }
    blockquote {
      border-left: 4px solid #e5e7eb;
      margin: 16px 0;
      padding-left: 16px;
      color: #6b7280;
    }
    img {
      max-width: 100%;
      height: auto;
    }
    .highlight {
      background-color: yellow;
    }
"#;

/// Wrap the document body in a self-contained HTML page.
pub fn standalone_html(body: &str, title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  \
         <title>{}</title>\n  <style>{}  </style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        STYLESHEET,
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_embedded_verbatim() {
        let page = standalone_html("<p>Hi <strong>there</strong></p>", "Q3 <draft>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Q3 &lt;draft&gt;</title>"));
        assert!(page.contains("<body>\n<p>Hi <strong>there</strong></p>\n</body>"));
        assert!(page.contains("color: #2563eb;"));
        assert!(page.trim_end().ends_with("</html>"));
    }
}
