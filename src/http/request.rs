//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser escrito a mano para el subconjunto de HTTP/1.1 que soporta el
//! servidor.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /files/report.txt HTTP/1.1\r\n
//! Host: localhost:4221\r\n
//! User-Agent: curl/8.5.0\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path VERSION` (la versión es opcional)
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: separa headers del body
//! 4. **Body**: todas las líneas restantes, concatenadas sin separadores
//!
//! El parsing es atómico: o se obtiene un `Request` completo o un
//! `ParseError`, nunca un request a medias.

use std::collections::HashMap;
use thiserror::Error;

/// Métodos HTTP
///
/// Los verbos desconocidos no son un error de parsing: llegan al router
/// como `Other` y simplemente no coinciden con ninguna ruta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// POST - Enviar datos a un recurso
    POST,

    /// Cualquier otro verbo, tal como llegó
    Other(String),
}

impl Method {
    fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Other(verb) => verb,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No llegó nada (o solo espacios / padding)
    #[error("Empty request")]
    EmptyRequest,

    /// La request line no tiene al menos método y path
    #[error("Invalid request line format")]
    InvalidRequestLine,

    /// Header sin el separador `": "` o sin nombre
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Target tal como llegó (ej: "/echo/abc")
    path: String,

    /// Segmentos no vacíos del path (ej: ["echo", "abc"])
    segments: Vec<String>,

    /// Versión HTTP, si el cliente la envió
    version: Option<String>,

    /// Headers con el nombre tal como llegó
    headers: HashMap<String, String>,

    /// Texto después de la línea vacía
    body: Option<String>,
}

impl Request {
    /// Parsea un request desde los bytes leídos del socket
    ///
    /// Los bytes se decodifican como UTF-8 con reemplazo, porque un buffer
    /// truncado puede cortar un carácter multibyte a la mitad.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use raw_http_server::http::Request;
    ///
    /// let raw = b"GET /echo/abc HTTP/1.1\r\nUser-Agent: test\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.segments(), ["echo", "abc"]);
    /// assert_eq!(request.header("User-Agent"), Some("test"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let text = String::from_utf8_lossy(buffer);

        if is_blank(&text) {
            return Err(ParseError::EmptyRequest);
        }

        let mut lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line));

        // 1. Request line
        let request_line = lines.next().ok_or(ParseError::EmptyRequest)?;
        let (method, path, version) = Self::parse_request_line(request_line)?;
        let segments = Self::split_segments(&path);

        // 2. Headers hasta la línea vacía, 3. body con lo que queda
        let mut headers = HashMap::new();
        let mut body = String::new();
        let mut in_body = false;

        for line in lines {
            if in_body {
                body.extend(line.chars().filter(|c| *c != '\0'));
                continue;
            }

            if is_blank(line) {
                in_body = true;
                continue;
            }

            let (name, value) = Self::parse_header(line)?;
            headers.insert(name, value);
        }

        Ok(Request {
            method,
            path,
            segments,
            version,
            headers,
            body: (!body.is_empty()).then_some(body),
        })
    }

    /// Formato: `GET /path HTTP/1.1`
    fn parse_request_line(line: &str) -> Result<(Method, String, Option<String>), ParseError> {
        let mut parts = line.split_whitespace();

        let (Some(method), Some(path)) = (parts.next(), parts.next()) else {
            return Err(ParseError::InvalidRequestLine);
        };

        let version = parts.next().map(str::to_string);
        Ok((Method::parse(method), path.to_string(), version))
    }

    /// "/echo/abc" -> ["echo", "abc"], "/" -> []
    fn split_segments(path: &str) -> Vec<String> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn parse_header(line: &str) -> Result<(String, String), ParseError> {
        let (name, value) =
            split_header(line).ok_or_else(|| ParseError::InvalidHeader(line.to_string()))?;

        Ok((name.to_string(), value.to_string()))
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Obtiene el path del request, sin modificar
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene los segmentos del path
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Obtiene la versión HTTP, si vino en la request line
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Obtiene un header específico
    ///
    /// Los nombres se guardan tal como llegaron. La búsqueda prueba primero
    /// el nombre exacto y, si no está, compara sin distinguir mayúsculas:
    /// `accept-encoding` y `Accept-Encoding` son el mismo header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(|s| s.as_str())
    }

    /// Obtiene el body del request
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// Separa una línea de header en el primer `": "` y recorta ambos lados
///
/// `None` si falta el separador o el nombre queda vacío.
pub(crate) fn split_header(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(": ")?;
    let name = name.trim();

    (!name.is_empty()).then_some((name, value.trim()))
}

/// Línea vacía: solo espacios en blanco o NUL
fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c == '\0' || c.is_whitespace())
}
