//! # Negociación de Contenido
//! src/http/encoding.rs
//!
//! Decide si el body de la respuesta viaja comprimido con gzip a partir del
//! header `Accept-Encoding` del cliente.
//!
//! ```text
//! Accept-Encoding: deflate, gzip     -> Gzip
//! Accept-Encoding: gzip;q=0, br      -> Identity
//! (sin header)                       -> Identity
//! ```

use crate::http::Request;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

/// Codificaciones que el servidor sabe producir
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Gzip,
    Identity,
}

impl ContentEncoding {
    /// Valor para el header `Content-Encoding`
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentEncoding::Gzip => "gzip",
            ContentEncoding::Identity => "identity",
        }
    }

    /// Elige la codificación para un request
    pub fn negotiate(request: &Request) -> Self {
        request
            .header("Accept-Encoding")
            .map(Self::from_accept_encoding)
            .unwrap_or(ContentEncoding::Identity)
    }

    /// Parsea la lista separada por comas de `Accept-Encoding`
    ///
    /// Los parámetros después de `;` se ignoran salvo `q=0`, que rechaza
    /// explícitamente la codificación.
    ///
    /// # Ejemplo
    /// ```
    /// use raw_http_server::http::ContentEncoding;
    ///
    /// assert_eq!(ContentEncoding::from_accept_encoding("br, gzip"), ContentEncoding::Gzip);
    /// assert_eq!(ContentEncoding::from_accept_encoding("invalid-encoding"), ContentEncoding::Identity);
    /// ```
    pub fn from_accept_encoding(header: &str) -> Self {
        let accepts_gzip = header.split(',').any(|token| {
            let mut params = token.split(';');
            let coding = params.next().unwrap_or_default().trim();

            coding.eq_ignore_ascii_case("gzip") && !params.any(is_zero_quality)
        });

        if accepts_gzip {
            ContentEncoding::Gzip
        } else {
            ContentEncoding::Identity
        }
    }

    /// Codifica los datos
    pub fn encode(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        match self {
            ContentEncoding::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(data)?;
                encoder.finish()
            }
            ContentEncoding::Identity => Ok(data.to_vec()),
        }
    }
}

fn is_zero_quality(param: &str) -> bool {
    param
        .trim()
        .strip_prefix("q=")
        .and_then(|q| q.trim().parse::<f32>().ok())
        .is_some_and(|q| q == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_single_gzip() {
        assert_eq!(ContentEncoding::from_accept_encoding("gzip"), ContentEncoding::Gzip);
    }

    #[test]
    fn test_gzip_in_list() {
        assert_eq!(
            ContentEncoding::from_accept_encoding("encoding-1, gzip, encoding-2"),
            ContentEncoding::Gzip
        );
        assert_eq!(ContentEncoding::from_accept_encoding("deflate,GZIP"), ContentEncoding::Gzip);
    }

    #[test]
    fn test_without_gzip() {
        assert_eq!(
            ContentEncoding::from_accept_encoding("encoding-1, encoding-2"),
            ContentEncoding::Identity
        );
        // Substring que no es el token gzip
        assert_eq!(ContentEncoding::from_accept_encoding("x-gzip-ish"), ContentEncoding::Identity);
    }

    #[test]
    fn test_quality_zero_refuses_gzip() {
        assert_eq!(ContentEncoding::from_accept_encoding("gzip;q=0"), ContentEncoding::Identity);
        assert_eq!(ContentEncoding::from_accept_encoding("gzip; q=0.0, br"), ContentEncoding::Identity);
        assert_eq!(ContentEncoding::from_accept_encoding("gzip;q=0.5"), ContentEncoding::Gzip);
    }

    #[test]
    fn test_negotiate_from_request() {
        let request = Request::parse(b"GET / HTTP/1.1\r\nAccept-Encoding: gzip\r\n\r\n").unwrap();
        assert_eq!(ContentEncoding::negotiate(&request), ContentEncoding::Gzip);

        let request = Request::parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(ContentEncoding::negotiate(&request), ContentEncoding::Identity);
    }

    #[test]
    fn test_gzip_output_decompresses() {
        let compressed = ContentEncoding::Gzip.encode(b"abc").unwrap();
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);

        let mut decoded = String::new();
        GzDecoder::new(&compressed[..]).read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, "abc");
    }

    #[test]
    fn test_identity_is_passthrough() {
        assert_eq!(ContentEncoding::Identity.encode(b"abc").unwrap(), b"abc");
    }
}
