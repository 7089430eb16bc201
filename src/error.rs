use std::fmt;
use std::path::PathBuf;

/// Two or more resolved files that would land on the same destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub destination: PathBuf,
    /// `(resource, source)` for every record mapping onto `destination`
    pub sources: Vec<(String, PathBuf)>,
}

/// Main error type for history restore operations
#[derive(Debug)]
pub enum LhrError {
    Access {
        path: PathBuf,
        role: String,
        reason: String,
    },
    Parse {
        dir: PathBuf,
        reason: String,
    },
    Mapping {
        resource: String,
        reason: String,
    },
    Validation {
        collisions: Vec<Collision>,
    },
    /// The user interrupted the run
    Interrupted,
    Copy {
        source: PathBuf,
        destination: PathBuf,
        cause: std::io::Error,
    },
    Config {
        message: String,
        path: Option<PathBuf>,
    },
    Io {
        source: std::io::Error,
        context: String,
    },
    Generic {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl LhrError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            LhrError::Access { .. } | LhrError::Config { .. } => 2,
            LhrError::Interrupted => 130,
            _ => 1,
        }
    }

    /// Short label used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            LhrError::Access { .. } => "access",
            LhrError::Parse { .. } => "parse",
            LhrError::Mapping { .. } => "mapping",
            LhrError::Validation { .. } => "validation",
            LhrError::Interrupted => "interrupted",
            LhrError::Copy { .. } => "copy",
            LhrError::Config { .. } => "config",
            LhrError::Io { .. } => "io",
            LhrError::Generic { .. } => "error",
        }
    }
}

impl fmt::Display for LhrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LhrError::Access { path, role, reason } => {
                write!(f, "Cannot access {} '{}': {}", role, path.display(), reason)
            }
            LhrError::Parse { dir, reason } => {
                write!(f, "Malformed history entry in {}: {}", dir.display(), reason)
            }
            LhrError::Mapping { resource, reason } => {
                write!(f, "Cannot map resource '{}': {}", resource, reason)
            }
            LhrError::Validation { collisions } => {
                write!(f, "{} destination collision(s)", collisions.len())?;
                for collision in collisions {
                    write!(f, "\n  {}", collision.destination.display())?;
                    for (resource, source) in &collision.sources {
                        write!(f, "\n    <- {} ({})", resource, source.display())?;
                    }
                }
                Ok(())
            }
            LhrError::Interrupted => write!(f, "Interrupted"),
            LhrError::Copy { source, destination, cause } => {
                write!(
                    f,
                    "Failed to copy {} to {}: {}",
                    source.display(),
                    destination.display(),
                    cause
                )
            }
            LhrError::Config { message, path } => {
                if let Some(path) = path {
                    write!(f, "Configuration error in {}: {}", path.display(), message)
                } else {
                    write!(f, "Configuration error: {}", message)
                }
            }
            LhrError::Io { context, source } => {
                write!(f, "IO error during {}: {}", context, source)
            }
            LhrError::Generic { message, .. } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for LhrError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LhrError::Io { source, .. } => Some(source),
            LhrError::Copy { cause, .. } => Some(cause),
            LhrError::Generic { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LhrError>;

pub trait ErrorContext<T> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    fn with_io_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::result::Result<T, std::io::Error> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| LhrError::Generic {
            message: f(),
            source: Some(Box::new(e)),
        })
    }

    fn with_io_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| LhrError::Io {
            source: e,
            context: f(),
        })
    }
}

impl<T> ErrorContext<T> for std::result::Result<T, LhrError> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| LhrError::Generic {
            message: format!("{}: {}", f(), e),
            source: Some(Box::new(e)),
        })
    }

    fn with_io_context<F>(self, _f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self
    }
}

impl From<anyhow::Error> for LhrError {
    fn from(err: anyhow::Error) -> Self {
        LhrError::Generic {
            message: err.to_string(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_every_source() {
        let err = LhrError::Validation {
            collisions: vec![Collision {
                destination: PathBuf::from("/out/a.txt"),
                sources: vec![
                    ("file:///src/a.txt".to_string(), PathBuf::from("/h/1/x")),
                    ("file:///src/A.txt".to_string(), PathBuf::from("/h/2/y")),
                ],
            }],
        };
        let text = err.to_string();
        assert!(text.contains("1 destination collision"));
        assert!(text.contains("file:///src/a.txt"));
        assert!(text.contains("file:///src/A.txt"));
    }

    #[test]
    fn exit_codes() {
        let access = LhrError::Access {
            path: PathBuf::from("/nope"),
            role: "history root".to_string(),
            reason: "missing".to_string(),
        };
        assert_eq!(access.exit_code(), 2);
        assert_eq!(access.kind(), "access");

        let parse = LhrError::Parse {
            dir: PathBuf::from("/h/1"),
            reason: "bad json".to_string(),
        };
        assert_eq!(parse.exit_code(), 1);
    }

    #[test]
    fn interrupt_exits_like_sigint() {
        assert_eq!(LhrError::Interrupted.exit_code(), 130);
        assert_eq!(LhrError::Interrupted.kind(), "interrupted");
    }

    #[test]
    fn converts_into_anyhow_with_question_mark() {
        fn fails() -> Result<()> {
            Err(LhrError::Mapping {
                resource: "file:///a".to_string(),
                reason: "escapes".to_string(),
            })
        }
        fn outer() -> anyhow::Result<()> {
            fails()?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert!(err.to_string().contains("file:///a"));
        assert!(matches!(
            err.downcast_ref::<LhrError>(),
            Some(LhrError::Mapping { .. })
        ));

        let back: LhrError = err.into();
        assert_eq!(back.kind(), "error");
    }

    #[test]
    fn io_context_wraps_error() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = res.with_io_context(|| "reading index".to_string()).unwrap_err();
        assert!(matches!(err, LhrError::Io { .. }));
        assert!(err.to_string().contains("reading index"));
    }
}
