//! Landing page served at `/`.
//!
//! Two ways in: the referrer form posting to `/open`, and a small address bar
//! that loads `/proxy?url=...` into a frame.

pub const PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Rewriting Proxy</title>
  <meta name="viewport" content="width=device-width,initial-scale=1">
  <style>
    html,body{height:100%;margin:0;font-family:system-ui,Segoe UI,Roboto,Arial,sans-serif;}
    form.open{display:flex;flex-wrap:wrap;gap:8px;padding:12px;background:#f3f3f3;}
    form.open label{display:flex;flex-direction:column;font-size:13px;flex:1;min-width:220px;}
    form.open input{padding:8px;border:1px solid #bbb;border-radius:6px;}
    form.open button{align-self:flex-end;padding:8px 14px;border:0;border-radius:6px;background:#222;color:#fff;cursor:pointer;}
    .toolbar{display:flex;align-items:center;gap:8px;padding:8px;background:#111;color:#fff;}
    .toolbar button{padding:6px 8px;border-radius:6px;border:0;background:#222;color:#fff;cursor:pointer;}
    .toolbar input{flex:1;padding:8px;border-radius:6px;border:0;}
    #viewport{width:100%;height:calc(100% - 140px);border:0;}
  </style>
</head>
<body>
  <form class="open" method="post" action="/open">
    <label>Referrer <input name="referrer" type="text" placeholder="https://www.google.com/"></label>
    <label>Target URL <input name="url" type="text" placeholder="https://example.com/" required></label>
    <button type="submit">Open</button>
  </form>
  <div class="toolbar">
    <button id="reload" type="button">&#x27F3;</button>
    <input id="address" type="text" placeholder="example.com">
    <button id="go" type="button">Go</button>
  </div>
  <iframe id="viewport" title="proxied page"></iframe>
<script>
const viewport = document.getElementById("viewport");
const address = document.getElementById("address");

function load(url) {
  if (!/^https?:\/\//i.test(url)) url = "https://" + url;
  viewport.src = "/proxy?url=" + encodeURIComponent(url);
  address.value = url;
}

document.getElementById("go").onclick = () => load(address.value.trim());
document.getElementById("reload").onclick = () => { viewport.src = viewport.src; };
address.addEventListener("keydown", (e) => { if (e.key === "Enter") load(address.value.trim()); });
</script>
</body>
</html>
"#;
