//! Server-rendered pages

use postgate_auth::AuthenticatedIdentity;

use crate::routes::types::Post;

/// Escape text for inclusion in HTML
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
</head>
<body>
  <nav><a href="/">Home</a> | <a href="/signup">Sign up</a> | <a href="/login">Log in</a> | <a href="/posts-page">Posts</a> | <a href="/logout">Log out</a></nav>
  <main>
{body}
  </main>
</body>
</html>
"#,
        title = escape(title),
        body = body
    )
}

fn error_block(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"    <p class="error">{}</p>"#, escape(e)))
        .unwrap_or_default()
}

pub fn index_page() -> String {
    layout(
        "Postgate",
        "    <h1>Postgate</h1>\n    <p>Sign up or log in to read the posts.</p>",
    )
}

pub fn login_page(error: Option<&str>) -> String {
    let body = format!(
        r#"    <h1>Log in</h1>
{error}
    <form action="/login" method="POST">
      <label>Username <input type="text" name="username" required></label>
      <label>Password <input type="password" name="password" required></label>
      <button type="submit">Log in</button>
    </form>"#,
        error = error_block(error)
    );
    layout("Log in", &body)
}

pub fn signup_page() -> String {
    layout(
        "Sign up",
        r#"    <h1>Sign up</h1>
    <form action="/signup" method="POST">
      <label>Username <input type="text" name="username" required></label>
      <label>Password <input type="password" name="password" required></label>
      <button type="submit">Sign up</button>
    </form>"#,
    )
}

pub fn posts_page(identity: &AuthenticatedIdentity, posts: &[Post]) -> String {
    let items: String = posts
        .iter()
        .map(|p| {
            format!(
                "      <li><strong>{}</strong> by {}</li>\n",
                escape(p.title),
                escape(p.username)
            )
        })
        .collect();

    let body = format!(
        "    <h1>Posts</h1>\n    <p>Logged in as {}</p>\n    <ul>\n{}    </ul>",
        escape(&identity.username),
        items
    );
    layout("Posts", &body)
}
