use std::sync::Arc;

use tokio::net::TcpStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::error::{Error, Result};

use super::socket::MaybeTlsStream;

/// Performs the in-place TLS upgrade described in §4.2: the caller has
/// already sent `SSLRequest` and must not have sent anything else yet.
///
/// `Trusted` and `System` (spec §6 `ssl`) both validate the server
/// certificate; they differ only in which trust store backs the
/// validation. A platform-native store needs a second crate the rest of
/// this driver's stack does not otherwise pull in, so `System` currently
/// falls back to the same bundled Mozilla roots as `Trusted` when
/// `ca_file` is not given (see DESIGN.md).
pub(crate) async fn upgrade(
    stream: TcpStream,
    host: &str,
    ca_file: Option<&std::path::Path>,
) -> Result<MaybeTlsStream> {
    let mut roots = RootCertStore::empty();

    if let Some(ca_file) = ca_file {
        let pem = tokio::fs::read(ca_file).await?;
        let mut reader = std::io::Cursor::new(pem);
        for cert in rustls_pemfile::certs(&mut reader) {
            let cert = cert.map_err(|e| Error::config(format!("invalid ssl-ca file: {e}")))?;
            roots
                .add(cert)
                .map_err(|e| Error::config(format!("invalid ssl-ca certificate: {e}")))?;
        }
    } else {
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let connector = TlsConnector::from(Arc::new(config));

    let server_name = tokio_rustls::rustls::pki_types::ServerName::try_from(host.to_owned())
        .map_err(|_| Error::config(format!("invalid server name for TLS SNI: {host}")))?;

    let tls = connector
        .connect(server_name, stream)
        .await
        .map_err(|e| Error::auth(format!("TLS handshake failed: {e}")))?;

    Ok(MaybeTlsStream::Tls(Box::new(tls)))
}
