//! Handlebars sources for the web UI. `{{ }}` escapes; nothing here uses `{{{ }}}`.

pub const STYLES: &str = r##"<style>
  :root { --brand:#4f46e5; --text:#111827; --muted:#6b7280; --line:#e5e7eb; }
  * { box-sizing:border-box; }
  body { margin:0; background:#f5f6fb; color:var(--text); font-family:Inter, ui-sans-serif, system-ui, -apple-system, "Segoe UI", Roboto, Arial, sans-serif; }
  .wrap { max-width:1150px; margin:0 auto; padding:0 16px; }
  header.wrap { padding-top:28px; padding-bottom:12px; }
  .card, .result-card { background:#fff; border-radius:16px; box-shadow:0 8px 24px rgba(17,24,39,.06); padding:20px; }
  .result-card { padding:16px; }
  .h1 { font:800 28px Inter, system-ui; letter-spacing:-0.01em; }
  .h2 { font:700 18px Inter, system-ui; margin-bottom:8px; }
  .hint { color:var(--muted); font:400 13px Inter, system-ui; }
  .grid { display:grid; grid-template-columns:1fr 1fr; gap:16px; }
  @media (max-width:800px) { .grid { grid-template-columns:1fr; } }
  .upload-box { border:2px dashed var(--line); border-radius:14px; padding:24px; transition:border .15s ease; }
  .upload-box:hover { border-color:#a5b4fc; }
  textarea { width:100%; min-height:270px; border:1px solid var(--line); border-radius:10px; padding:10px; font-family:ui-monospace, SFMono-Regular, Menlo, monospace; }
  .controls { display:flex; align-items:center; justify-content:space-between; margin:16px auto; }
  button { background:var(--brand); color:#fff; border:0; border-radius:10px; font-weight:700; font-size:16px; padding:12px 16px; cursor:pointer; }
  .error { color:#991b1b; background:#fee2e2; border-radius:10px; padding:12px 16px; font-weight:700; margin:12px auto; }
  .pill { display:inline-block; margin:4px 6px 0 0; padding:6px 10px; border-radius:9999px; font:600 12px Inter, system-ui; }
  .pill.ok { background:#d1fae5; color:#065f46; }
  .pill.miss { background:#fee2e2; color:#991b1b; }
  .pill small { font-weight:400; opacity:.8; margin-left:4px; }
  .all-clear { color:#065f46; font:600 14px Inter, system-ui; }
  .gauge { display:flex; align-items:center; gap:18px; }
  .tabs { margin:16px auto 40px; }
  .tabs > input { display:none; }
  .tabs > label { display:inline-block; padding:8px 14px; margin-right:4px; border-radius:10px 10px 0 0; cursor:pointer; color:var(--muted); font-weight:600; }
  .tabs > input:checked + label { background:#fff; color:var(--text); }
  .panel { display:none; background:#fff; border-radius:0 16px 16px 16px; padding:20px; }
  #tab-overview:checked ~ #panel-overview,
  #tab-missing:checked ~ #panel-missing,
  #tab-preview:checked ~ #panel-preview,
  #tab-raw:checked ~ #panel-raw,
  #tab-skills:checked ~ #panel-skills { display:block; }
  table.categories { border-collapse:collapse; margin-top:12px; width:100%; font-size:14px; }
  table.categories td, table.categories th { text-align:left; padding:6px 8px; border-bottom:1px solid var(--line); }
  pre { white-space:pre-wrap; word-wrap:break-word; background:#f9fafb; border:1px solid var(--line); border-radius:10px; padding:12px; font-size:13px; }
  mark { background:#fef08a; border-radius:3px; padding:0 2px; }
</style>"##;

pub const PAGE: &str = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>ATS Resume Analyzer</title>
{{> styles}}
</head>
<body>
<header class="wrap">
  <div class="h1">ATS Resume Analyzer</div>
  <div class="hint">Upload your resume and paste a job description to see a clear, defensible ATS score plus missing skills.</div>
</header>

<form class="wrap" method="post" action="/analyze" enctype="multipart/form-data">
  <div class="grid">
    <div class="card">
      <div class="h2">Upload Resume PDF</div>
      <div class="upload-box">
        <input type="file" name="resume" accept=".pdf,application/pdf">
        <div class="hint">PDF up to {{max_upload_mb}} MB</div>
      </div>
    </div>
    <div class="card">
      <div class="h2">Paste Job Description</div>
      <textarea name="jd_text" placeholder="Paste the JD here…">{{jd_text}}</textarea>
    </div>
  </div>
  <div class="controls">
    <label><input type="checkbox" name="show_resume"{{#if show_resume}} checked{{/if}}> Show full resume text in output</label>
    <button type="submit">🔍 Analyze and Highlight</button>
  </div>
</form>

{{#if error}}
<div class="wrap"><div class="error">{{error}}</div></div>
{{/if}}

{{#with results}}
<div class="wrap tabs">
  <input type="radio" name="tab" id="tab-overview" checked><label for="tab-overview">Overview</label>
  <input type="radio" name="tab" id="tab-missing"><label for="tab-missing">Missing Skills</label>
  {{#if show_resume}}
  <input type="radio" name="tab" id="tab-preview"><label for="tab-preview">Preview</label>
  <input type="radio" name="tab" id="tab-raw"><label for="tab-raw">Resume Raw</label>
  {{/if}}
  <input type="radio" name="tab" id="tab-skills"><label for="tab-skills">Skills</label>

  <section class="panel" id="panel-overview">
    <div class="gauge">
      <svg width="140" height="140" viewBox="0 0 140 140">
        <circle cx="70" cy="70" r="{{gauge.radius}}" fill="none" stroke="#e5e7eb" stroke-width="{{gauge.stroke}}"/>
        <circle cx="70" cy="70" r="{{gauge.radius}}" fill="none" stroke="{{gauge.color}}" stroke-width="{{gauge.stroke}}"
                stroke-linecap="round" stroke-dasharray="{{gauge.circumference}}" stroke-dashoffset="{{gauge.offset}}"
                transform="rotate(-90 70 70)"/>
        <text x="50%" y="52%" dominant-baseline="middle" text-anchor="middle"
              style="font:700 24px Inter, system-ui; fill:{{gauge.color}};">{{gauge.score_text}}</text>
      </svg>
      <div>
        <div style="font:700 18px Inter, system-ui;">ATS Match Score</div>
        <div style="color:{{gauge.color}}; font:600 16px Inter, system-ui;">{{gauge.verdict}}</div>
        <div class="hint">Semantic {{semantic_score}} • Skill coverage {{coverage_score}} • Higher is better</div>
      </div>
    </div>
    <p>{{recommendation}}</p>
    <div class="result-card">
      <div class="h2">Skills Summary</div>
      <div class="hint" style="margin:6px 0 12px">
        Matched <b>{{matched_count}}</b> of <b>{{jd_skill_count}}</b> JD skills •
        Resume words: <b>{{resume_words}}</b> • JD words: <b>{{jd_words}}</b>
      </div>
      <div>{{#each matched}}<span class="pill ok">{{text}}</span>{{else}}<span class="hint">No direct skill overlaps found.</span>{{/each}}</div>
      {{#if categories}}
      <table class="categories">
        <tr><th>Category</th><th>Matched</th><th>Coverage</th></tr>
        {{#each categories}}
        <tr><td>{{label}}{{#if capped}} <span class="hint">(capped)</span>{{/if}}</td><td>{{matched}} / {{total}}</td><td>{{percent}}%</td></tr>
        {{/each}}
      </table>
      {{/if}}
    </div>
    <div class="hint" style="margin-top:10px">Embedder: {{embedder}}{{#if extraction_backend}} • PDF text via {{extraction_backend}}{{/if}}</div>
  </section>

  <section class="panel" id="panel-missing">
    {{#if missing}}
    <div class="h2" style="color:#991b1b">Missing Skills for ATS</div>
    <div class="result-card">{{#each missing}}<span class="pill miss">{{text}}{{#if note}}<small>{{note}}</small>{{/if}}</span>{{/each}}</div>
    {{else}}
    <div class="all-clear">✔ All JD skills are represented in your resume.</div>
    {{/if}}
  </section>

  {{#if show_resume}}
  <section class="panel" id="panel-preview">
    <div class="h2">Resume Preview</div>
    <details open>
      <summary class="hint">Show Extracted Text (first 3000 chars)</summary>
      <pre>{{#each preview}}{{#if mark}}<mark>{{text}}</mark>{{else}}{{text}}{{/if}}{{/each}}</pre>
    </details>
  </section>

  <section class="panel" id="panel-raw">
    <pre>{{raw}}</pre>
  </section>
  {{/if}}

  <section class="panel" id="panel-skills">
    <div class="h2">Skills</div>
    <div class="result-card" style="margin:8px 0"><b>Resume:</b><br>
      {{#each resume_skills}}<span class="pill ok">{{text}}</span>{{else}}<span class="hint">None found.</span>{{/each}}
    </div>
    <div class="result-card"><b>Job Description:</b><br>
      {{#each jd_skills}}<span class="pill {{#if ok}}ok{{else}}miss{{/if}}">{{text}}</span>{{else}}<span class="hint">None found.</span>{{/each}}
    </div>
  </section>
</div>
{{/with}}
</body>
</html>
"##;
