//! Minimal HTML rendering for the login, landing and error pages.

use html_escape::encode_safe;

use crate::i18n::{UI_TEXTS, html_lang};

pub(crate) const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>qrgate</title></head>
<body>
<h1>qrgate</h1>
<p>QR code login proxy.</p>
<ul>
<li><a href="/auth/auto/">Sign in</a></li>
<li><a href="/demo/">Demo</a></li>
</ul>
</body>
</html>
"#;

pub(crate) const DEMO_HTML: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>qrgate demo</title></head>
<body>
<h1>Embedded login</h1>
<iframe src="/auth/auto/" width="420" height="640" title="login"></iframe>
<pre id="token"></pre>
<script>
window.addEventListener("message", (event) => {
  if (event.data && event.data.access_token) {
    document.getElementById("token").textContent = event.data.access_token;
  }
});
</script>
</body>
</html>
"#;

const AUTH_TEMPLATE: &str = r##"<!doctype html>
<html lang="{{lang}}" data-locale="{{locale}}">
<head><meta charset="utf-8"><title>{{title}}</title></head>
<body data-wait="{{wait}}" data-fail="{{fail}}" data-end="{{end}}" data-rm="{{rm}}" data-tf="{{tf}}" data-sus="{{sus}}">
<h1>{{title}}</h1>
<p>{{dis}}</p>
<p id="status">{{wait}}</p>
<p>{{plzscan}}</p>
<p><a id="login-link" href="#" target="_blank" rel="noopener">{{md}}</a></p>
<p><span>{{rm}}</span>: <span id="remaining"></span></p>
<footer>
<a href="https://support-leagueoflegends.riotgames.com/">{{gg}}</a>
<a href="https://www.riotgames.com/privacy-notice">{{pp}}</a>
<a href="https://www.riotgames.com/terms-of-service">{{sp}}</a>
<a href="https://www.riotgames.com/cookie-policy">{{cs}}</a>
<label>{{cl}} <select id="language"></select></label>
<a href="/">{{ss}}</a>
</footer>
<script>
const page = document.body.dataset;
const status = document.getElementById("status");
const link = document.getElementById("login-link");
const remaining = document.getElementById("remaining");
let sessionId = null;
let deadline = 0;

function show(url) {
  link.href = url;
  deadline = Date.now() + 60000;
}

async function start() {
  status.textContent = page.wait;
  const response = await fetch("/login_url", {
    method: "POST",
    headers: { "country-code": document.documentElement.dataset.locale || "auto" },
  });
  const body = await response.json();
  if (!response.ok) { status.textContent = page.fail; return; }
  sessionId = body.session_id;
  status.textContent = "";
  show(body.login_url);
  poll();
}

async function poll() {
  const response = await fetch("/get_token", {
    method: "POST",
    headers: { "x-session-id": sessionId },
  });
  const body = await response.json();
  if (body.access_token) {
    status.textContent = page.sus;
    window.parent.postMessage(body, "*");
    return;
  }
  if (body.new_url) { status.textContent = page.end; show(body.new_url); }
  else if (!response.ok) { status.textContent = page.tf; return; }
  remaining.textContent = Math.max(0, Math.round((deadline - Date.now()) / 1000));
  setTimeout(poll, 2000);
}

start();
</script>
</body>
</html>
"##;

const ERROR_TEMPLATE: &str = r#"<!doctype html>
<html lang="{{lang}}">
<head><meta charset="utf-8"><title>{{status}}</title></head>
<body>
<h1>{{status}}</h1>
<h2>{{error_message}}</h2>
<p>{{message}}</p>
</body>
</html>
"#;

fn fill(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |page, (key, value)| {
        page.replace(&format!("{{{{{key}}}}}"), value)
    })
}

/// Render the login page from texts ordered like [`UI_TEXTS`].
pub(crate) fn render_auth_page(locale: &str, texts: &[String]) -> String {
    let escaped: Vec<(&str, String)> = UI_TEXTS
        .iter()
        .zip(texts)
        .map(|((key, _), text)| (*key, encode_safe(text).into_owned()))
        .collect();
    let mut values: Vec<(&str, &str)> = escaped
        .iter()
        .map(|(key, text)| (*key, text.as_str()))
        .collect();
    values.push(("lang", html_lang(locale)));
    values.push(("locale", locale));
    fill(AUTH_TEMPLATE, &values)
}

/// Render an error page.
pub(crate) fn render_error_page(
    status: u16,
    message: &str,
    error_message: &str,
    locale: &str,
) -> String {
    let status = status.to_string();
    let message = encode_safe(message);
    let error_message = encode_safe(error_message);
    fill(
        ERROR_TEMPLATE,
        &[
            ("status", status.as_str()),
            ("message", &message),
            ("error_message", &error_message),
            ("lang", locale),
        ],
    )
}
