//! Certificate location and loading
//!
//! Resolves the conventional `ca.pem` / `cert.pem` / `key.pem` layout used
//! by Docker into loaded OpenSSL objects.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use openssl::pkey::{PKey, Private};
use openssl::x509::X509;

use super::error::HostError;

/// Conventional CA certificate file name
pub const CA_FILE_NAME: &str = "ca.pem";

/// Conventional client certificate file name
pub const CLIENT_CERT_FILE_NAME: &str = "cert.pem";

/// Conventional client private key file name
pub const CLIENT_KEY_FILE_NAME: &str = "key.pem";

/// Client certificate bound to its private key
#[derive(Clone)]
pub struct ClientCertificate {
    certificate: X509,
    private_key: PKey<Private>,
}

impl ClientCertificate {
    pub fn certificate(&self) -> &X509 {
        &self.certificate
    }

    pub fn private_key(&self) -> &PKey<Private> {
        &self.private_key
    }
}

impl fmt::Debug for ClientCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCertificate")
            .field("subject", &self.certificate.subject_name())
            .finish_non_exhaustive()
    }
}

/// Certificate material found in a directory
#[derive(Debug, Clone)]
pub struct CertificateMaterial {
    /// CA certificate used to verify the daemon
    pub authority: X509,
    /// Client certificate, when a cert/key pair was requested
    pub client: Option<ClientCertificate>,
}

/// CA certificate and client identity presented on a TLS connection
#[derive(Debug, Clone)]
pub struct TlsIdentity {
    pub authority: X509,
    pub client: ClientCertificate,
}

/// Paths of the three PEM files making up a TLS identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificatePaths {
    pub ca: PathBuf,
    pub cert: PathBuf,
    pub key: PathBuf,
}

impl CertificatePaths {
    /// Conventional file layout inside a certificate directory
    pub fn in_directory(directory: &Path) -> Self {
        Self {
            ca: directory.join(CA_FILE_NAME),
            cert: directory.join(CLIENT_CERT_FILE_NAME),
            key: directory.join(CLIENT_KEY_FILE_NAME),
        }
    }
}

/// Locate certificate material inside `directory`
///
/// Always loads the CA certificate. When `client` names a cert/key pair,
/// the client certificate is loaded as well and checked against its key.
pub fn locate(
    directory: &Path,
    ca_file_name: &str,
    client: Option<(&str, &str)>,
) -> Result<CertificateMaterial, HostError> {
    let authority = load_authority(&directory.join(ca_file_name))?;

    let client = match client {
        Some((cert_file_name, key_file_name)) => Some(load_client(
            &directory.join(cert_file_name),
            &directory.join(key_file_name),
        )?),
        None => None,
    };

    Ok(CertificateMaterial { authority, client })
}

/// Load the CA certificate and client pair named by `paths`
pub fn load_identity(paths: &CertificatePaths) -> Result<TlsIdentity, HostError> {
    Ok(TlsIdentity {
        authority: load_authority(&paths.ca)?,
        client: load_client(&paths.cert, &paths.key)?,
    })
}

/// Load a CA certificate from a PEM file
pub fn load_authority(path: &Path) -> Result<X509, HostError> {
    let pem = read_pem(path)?;
    X509::from_pem(&pem).map_err(|e| HostError::CertificateParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Load a client certificate and the private key it was issued for
pub fn load_client(cert_path: &Path, key_path: &Path) -> Result<ClientCertificate, HostError> {
    let cert_pem = read_pem(cert_path)?;
    let key_pem = read_pem(key_path)?;

    let certificate = X509::from_pem(&cert_pem).map_err(|e| HostError::CertificateParse {
        path: cert_path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let private_key =
        PKey::private_key_from_pem(&key_pem).map_err(|e| HostError::CertificateParse {
            path: key_path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let public_key = certificate
        .public_key()
        .map_err(|e| HostError::CertificateParse {
            path: cert_path.to_path_buf(),
            reason: e.to_string(),
        })?;
    if !public_key.public_eq(&private_key) {
        return Err(HostError::CertificateParse {
            path: key_path.to_path_buf(),
            reason: format!(
                "private key does not match certificate {}",
                cert_path.display()
            ),
        });
    }

    Ok(ClientCertificate {
        certificate,
        private_key,
    })
}

fn read_pem(path: &Path) -> Result<Vec<u8>, HostError> {
    tracing::debug!("Reading certificate material: {}", path.display());

    fs::read(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            HostError::CertificateNotFound {
                path: path.to_path_buf(),
            }
        } else {
            HostError::CertificateParse {
                path: path.to_path_buf(),
                reason: format!("unreadable: {e}"),
            }
        }
    })
}
