//! Canned pages and model responses.

/// An English company page with a contact footer.
pub const ACME_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Acme Corporation</title>
  <script>window.analytics = [];</script>
</head>
<body>
  <header><nav><a href="/">Home</a> <a href="/about">About</a></nav></header>
  <main>
    <h1>Acme Corporation</h1>
    <section id="about">
      <h2>About us</h2>
      <p>Acme builds reliable widgets for compliance teams since 1999.</p>
    </section>
  </main>
  <footer>
    <p>Contact: info@acme.example | (555) 123-4567</p>
    <p>1 Main Street, Springfield</p>
  </footer>
</body>
</html>"#;

/// A German company page with an imprint.
pub const GERMAN_HTML: &str = r#"<!DOCTYPE html>
<html lang="de">
<head><title>Beispiel GmbH</title></head>
<body>
  <main>
    <h1>Über uns</h1>
    <p>Wir sind ein Familienunternehmen aus Berlin.</p>
  </main>
  <footer>
    <h2>Impressum</h2>
    <p>Firma: Beispiel GmbH</p>
    <p>Kontakt: kontakt@beispiel.example, Tel: +49 3012 3456789</p>
    <p>Musterstraße 1, 10115 Berlin</p>
  </footer>
</body>
</html>"#;

/// A clean, complete model response for [`ACME_HTML`].
pub const ACME_RESPONSE: &str = r#"{
    "company_name": "Acme Corporation",
    "contact_email": "info@acme.example",
    "phone_number": "(555) 123-4567",
    "address": "1 Main Street, Springfield",
    "about_us_text": "Acme builds reliable widgets for compliance teams since 1999."
}"#;

/// A response that wraps the JSON object in prose and a code fence.
pub const PROSE_RESPONSE: &str = "Here is what I found:\n```json\n{\"company_name\": \"Beispiel GmbH\", \"contact_email\": \"kontakt@beispiel.example\", \"phone_number\": null}\n```\nLet me know if you need more.";

/// A response with no JSON object at all.
pub const GIBBERISH_RESPONSE: &str = "I am unable to determine the company details from this page.";

/// A response whose `phone_number` is an array instead of a string.
pub const WRONG_TYPE_RESPONSE: &str = r#"{"company_name": "Acme", "phone_number": ["555-0100", "555-0101"]}"#;
