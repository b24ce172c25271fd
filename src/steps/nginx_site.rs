//! nginx site definition
//!
//! Sites are built as a tree of directives and blocks and rendered by a
//! single function, so quoting and indentation are handled in one place.

use std::fmt::Write as _;

use crate::domain::{ProvisioningRequest, ResolvedPaths};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directive { name: String, args: Vec<String> },
    Block { name: String, args: Vec<String>, body: Vec<Node> },
}

impl Node {
    pub fn directive<I, S>(name: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Node::Directive {
            name: name.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn block<I, S>(name: &str, args: I, body: Vec<Node>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Node::Block {
            name: name.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            body,
        }
    }
}

/// A complete site file: a sequence of top-level blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDefinition {
    pub nodes: Vec<Node>,
}

impl SiteDefinition {
    /// HTTP redirect plus HTTPS server for a PHP-FPM backed project
    pub fn for_project(request: &ProvisioningRequest, paths: &ResolvedPaths) -> Self {
        let domain = request.domain();
        let socket = format!("unix:{}", paths.php_socket.display());

        let redirect = Node::block(
            "server",
            Vec::<String>::new(),
            vec![
                Node::directive("listen", ["80"]),
                Node::directive("listen", ["[::]:80"]),
                Node::directive("server_name", [domain]),
                Node::directive("return", ["301", "https://$host$request_uri"]),
            ],
        );

        let php = Node::block(
            "location",
            ["~", "\\.php$"],
            vec![
                Node::directive("include", ["fastcgi_params"]),
                Node::directive("fastcgi_pass", [socket.as_str()]),
                Node::directive("fastcgi_index", ["index.php"]),
                Node::directive(
                    "fastcgi_param",
                    ["SCRIPT_FILENAME", "$realpath_root$fastcgi_script_name"],
                ),
                Node::directive("fastcgi_param", ["DOCUMENT_ROOT", "$realpath_root"]),
            ],
        );

        let https = Node::block(
            "server",
            Vec::<String>::new(),
            vec![
                // listen-level http2 parses on every nginx from 1.9.5
                Node::directive("listen", ["443", "ssl", "http2"]),
                Node::directive("listen", ["[::]:443", "ssl", "http2"]),
                Node::directive("server_name", [domain]),
                Node::directive("root", [paths.public_dir.display().to_string()]),
                Node::directive("index", ["index.php", "index.html"]),
                Node::directive("charset", ["utf-8"]),
                Node::directive(
                    "ssl_certificate",
                    [paths.cert_file.display().to_string()],
                ),
                Node::directive(
                    "ssl_certificate_key",
                    [paths.key_file.display().to_string()],
                ),
                Node::directive("client_max_body_size", ["64m"]),
                Node::block(
                    "location",
                    ["/"],
                    vec![Node::directive(
                        "try_files",
                        ["$uri", "$uri/", "/index.php?$query_string"],
                    )],
                ),
                Node::block(
                    "location",
                    ["=", "/favicon.ico"],
                    vec![
                        Node::directive("access_log", ["off"]),
                        Node::directive("log_not_found", ["off"]),
                    ],
                ),
                Node::directive("error_page", ["404", "/index.php"]),
                php,
                Node::block(
                    "location",
                    ["~", "/\\.(?!well-known).*"],
                    vec![Node::directive("deny", ["all"])],
                ),
            ],
        );

        Self {
            nodes: vec![redirect, https],
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("# Managed by devsite; regenerated on every run\n");
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            render_node(&mut out, node, 0);
        }
        out
    }
}

fn render_node(out: &mut String, node: &Node, depth: usize) {
    let indent = "    ".repeat(depth);
    match node {
        Node::Directive { name, args } => {
            let _ = writeln!(out, "{indent}{};", head(name, args));
        }
        Node::Block { name, args, body } => {
            let _ = writeln!(out, "{indent}{} {{", head(name, args));
            for child in body {
                render_node(out, child, depth + 1);
            }
            let _ = writeln!(out, "{indent}}}");
        }
    }
}

fn head(name: &str, args: &[String]) -> String {
    let mut line = name.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&quote_arg(arg));
    }
    line
}

/// Quote arguments nginx would otherwise split or misread
fn quote_arg(arg: &str) -> String {
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ';' | '{' | '}' | '"' | '\''));
    if needs_quotes {
        format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn site() -> String {
        let request = ProvisioningRequest::new("blog-app", "blog-app.local", "8.3").unwrap();
        let paths = ResolvedPaths::derive(&request, &Settings::default());
        SiteDefinition::for_project(&request, &paths).render()
    }

    #[test]
    fn test_directive_rendering() {
        let mut out = String::new();
        render_node(&mut out, &Node::directive("listen", ["443", "ssl"]), 1);
        assert_eq!(out, "    listen 443 ssl;\n");
    }

    #[test]
    fn test_block_rendering() {
        let node = Node::block(
            "location",
            ["/"],
            vec![Node::directive("try_files", ["$uri", "/index.php"])],
        );
        let mut out = String::new();
        render_node(&mut out, &node, 0);
        assert_eq!(out, "location / {\n    try_files $uri /index.php;\n}\n");
    }

    #[test]
    fn test_arguments_with_spaces_are_quoted() {
        assert_eq!(quote_arg("/srv/my site/public"), "\"/srv/my site/public\"");
        assert_eq!(quote_arg("$uri"), "$uri");
    }

    #[test]
    fn test_site_binds_domain_root_socket_and_certs() {
        let rendered = site();
        assert!(rendered.contains("    server_name blog-app.local;\n"));
        assert!(rendered.contains("    root /var/www/blog-app/public;\n"));
        assert!(rendered.contains("fastcgi_pass unix:/run/php/php8.3-fpm.sock;"));
        assert!(rendered.contains("ssl_certificate /etc/nginx/ssl/blog-app.local.crt;"));
        assert!(rendered.contains("ssl_certificate_key /etc/nginx/ssl/blog-app.local.key;"));
        assert!(rendered.contains("return 301 https://$host$request_uri;"));
        assert!(rendered.contains("try_files $uri $uri/ /index.php?$query_string;"));
    }

    #[test]
    fn test_http2_enabled_on_listen_line() {
        let rendered = site();
        assert!(rendered.contains("    listen 443 ssl http2;\n"));
        assert!(rendered.contains("    listen [::]:443 ssl http2;\n"));
        assert!(!rendered.contains("http2 on"));
    }

    #[test]
    fn test_braces_balance() {
        let rendered = site();
        assert_eq!(rendered.matches('{').count(), rendered.matches('}').count());
        assert_eq!(rendered.matches("server {").count(), 2);
    }

    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(site(), site());
    }
}
