//! Static page shells. The order page is only reachable with a session.

use axum::response::{Html, Redirect};

const LOGIN_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Sign in</title></head>
<body>
<form id="login">
  <input name="username" placeholder="username" autocomplete="username">
  <input name="password" type="password" placeholder="password" autocomplete="current-password">
  <button type="submit">Sign in</button>
</form>
<script>
document.getElementById("login").addEventListener("submit", async (e) => {
  e.preventDefault();
  const form = new FormData(e.target);
  const res = await fetch("/api/login", {
    method: "POST",
    headers: { "content-type": "application/json" },
    body: JSON.stringify({ username: form.get("username"), password: form.get("password") }),
  });
  if (res.ok) {
    location.href = new URLSearchParams(location.search).get("from") || "/order";
  }
});
</script>
</body>
</html>
"#;

const ORDER_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Orders</title></head>
<body>
<textarea id="payload" rows="16" cols="80">{"order":{"order_id":"1","user":{"user_id":1},"cart":{"items":[{"product_id":1,"qty":1}]}}}</textarea>
<input id="url" placeholder="destination URL (optional)" size="60">
<button id="send">Send</button>
<pre id="log"></pre>
<script>
document.getElementById("send").addEventListener("click", async () => {
  const url = document.getElementById("url").value.trim();
  const payload = JSON.parse(document.getElementById("payload").value);
  const res = await fetch("/api/order", {
    method: "POST",
    headers: { "content-type": "application/json" },
    body: JSON.stringify(url ? { url, payload } : payload),
  });
  document.getElementById("log").textContent += res.status + " " + (await res.text()) + "\n";
});
</script>
</body>
</html>
"#;

pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

pub async fn order_page() -> Html<&'static str> {
    Html(ORDER_PAGE)
}

pub async fn index() -> Redirect {
    Redirect::temporary("/order")
}
