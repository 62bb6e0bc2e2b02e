//! # Storage root
//! src/storage.rs
//!
//! Directorio donde los handlers de `/files/` leen y escriben. El nombre
//! que llega en la URL se une al root tal cual.
//!
//! Sin `confine`, un nombre como `../secreto` sale del root: es el
//! comportamiento por defecto y está documentado como limitación. Con
//! `confine` activado se rechazan los nombres que no sean componentes
//! normales de ruta.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Errores de acceso al storage
#[derive(Debug, Error)]
pub enum StorageError {
    /// El archivo no existe
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// El nombre resuelve fuera del storage root
    #[error("path escapes storage root: {0}")]
    OutsideRoot(String),

    /// Cualquier otro error de I/O
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Directorio de archivos servidos
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
    confine: bool,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            confine: false,
        }
    }

    /// Activa o desactiva el confinamiento de rutas bajo el root
    pub fn confined(mut self, confine: bool) -> Self {
        self.confine = confine;
        self
    }

    /// Resuelve `name` dentro del root
    pub fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        if self.confine {
            let escapes = Path::new(name)
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
            if escapes {
                return Err(StorageError::OutsideRoot(name.to_string()));
            }
        }

        // Un nombre absoluto reemplazaría el root en `join`
        Ok(self.root.join(name.trim_start_matches('/')))
    }

    /// Lee el archivo completo
    pub fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(name)?;

        fs::read(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StorageError::NotFound(path)
            } else {
                StorageError::Io { path, source }
            }
        })
    }

    /// Crea o sobrescribe el archivo con `contents` (permisos 0644 en Unix)
    pub fn write(&self, name: &str, contents: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(name)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        options
            .open(&path)
            .and_then(|mut file| file.write_all(contents))
            .map_err(|source| StorageError::Io { path, source })
    }
}
