//! `uesave` process adapter.
//!
//! `uesave to-json` reads a GVAS payload on stdin and prints JSON; `uesave
//! from-json` does the reverse. Maps whose key schema cannot be inferred get
//! explicit `--type` hints.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use crate::converter::{KeyTypeOverride, TreeConverter, PALWORLD_KEY_TYPES};
use crate::tree::PropertyTree;
use crate::{Error, Result};

/// File name of the `uesave` executable on this platform.
pub fn program_name() -> Result<&'static str> {
    if cfg!(target_os = "windows") {
        Ok("uesave.exe")
    } else if cfg!(target_os = "linux") {
        Ok("uesave")
    } else {
        Err(Error::UnsupportedPlatform(std::env::consts::OS.to_string()))
    }
}

/// Runs the `uesave` executable to convert between GVAS and JSON.
#[derive(Debug, Clone)]
pub struct UesaveConverter {
    program: PathBuf,
    key_types: Vec<KeyTypeOverride>,
}

impl UesaveConverter {
    /// Use the executable at `program`, with the Palworld key type hints.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            key_types: PALWORLD_KEY_TYPES.to_vec(),
        }
    }

    /// Use the platform's `uesave` build inside `dir`.
    pub fn locate<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Ok(Self::new(dir.as_ref().join(program_name()?)))
    }

    /// Replace the key type hints.
    pub fn with_key_types<I>(mut self, key_types: I) -> Self
    where
        I: IntoIterator<Item = KeyTypeOverride>,
    {
        self.key_types = key_types.into_iter().collect();
        self
    }

    /// Add a key type hint.
    pub fn add_key_type(mut self, key_type: KeyTypeOverride) -> Self {
        self.key_types.push(key_type);
        self
    }

    /// Path of the executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Key type hints passed to `to-json`.
    pub fn key_types(&self) -> &[KeyTypeOverride] {
        &self.key_types
    }

    fn to_json_args(&self) -> Vec<OsString> {
        let mut args = vec![OsString::from("to-json")];
        for key_type in &self.key_types {
            args.push("--type".into());
            args.push(key_type.to_string().into());
        }
        args
    }

    /// Run the converter with `input` on stdin and return its stdout.
    fn run(&self, args: &[OsString], input: &[u8]) -> Result<Vec<u8>> {
        log::debug!(
            "running {} {:?} with {} bytes of input",
            self.program.display(),
            args,
            input.len()
        );

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::ConverterSpawn {
                program: self.program.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::ConverterOutput("converter stdin was not captured".into()))?;

        // Feed stdin from a helper thread so a full stdout pipe cannot stall us.
        let (output, written) = thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(input));
            let output = child.wait_with_output();
            let written = writer.join().unwrap_or_else(|_| {
                Err(io::Error::new(io::ErrorKind::Other, "stdin writer panicked"))
            });
            (output, written)
        });

        let output = output?;
        if !output.status.success() {
            return Err(Error::ConverterFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written.map_err(|e| {
            Error::ConverterOutput(format!(
                "failed to feed input to {}: {}",
                self.program.display(),
                e
            ))
        })?;

        log::debug!("converter produced {} bytes", output.stdout.len());
        Ok(output.stdout)
    }
}

impl TreeConverter for UesaveConverter {
    fn to_tree(&self, gvas: &[u8]) -> Result<PropertyTree> {
        let json = self.run(&self.to_json_args(), gvas)?;
        PropertyTree::from_json_slice(&json)
            .map_err(|e| Error::ConverterOutput(format!("invalid JSON from converter: {}", e)))
    }

    fn from_tree(&self, tree: &PropertyTree) -> Result<Vec<u8>> {
        let json = tree.to_json_string()?;
        self.run(&[OsString::from("from-json")], json.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json_args() {
        let converter = UesaveConverter::new("uesave");
        let args = converter.to_json_args();

        assert_eq!(args.len(), 1 + 2 * PALWORLD_KEY_TYPES.len());
        assert_eq!(args[0], "to-json");
        assert_eq!(args[1], "--type");
        assert_eq!(args[2], ".worldSaveData.CharacterSaveParameterMap.Key=Struct");
        assert_eq!(
            args[12],
            ".worldSaveData.CharacterContainerSaveData.Key=Struct"
        );
    }

    #[test]
    fn test_key_type_builders() {
        let converter = UesaveConverter::new("uesave")
            .with_key_types([])
            .add_key_type(KeyTypeOverride::new(".a.B", "Guid"));
        assert_eq!(converter.key_types().len(), 1);
        assert_eq!(
            converter.to_json_args(),
            vec![OsString::from("to-json"), "--type".into(), ".a.B.Key=Guid".into()]
        );
    }

    #[cfg(any(target_os = "linux", target_os = "windows"))]
    #[test]
    fn test_locate() {
        let converter = UesaveConverter::locate("bin").unwrap();
        assert_eq!(converter.program(), Path::new("bin").join(program_name().unwrap()));
    }

    #[test]
    fn test_missing_program() {
        let converter = UesaveConverter::new("/nonexistent/palsave/uesave");
        assert!(matches!(
            converter.to_tree(b"GVAS"),
            Err(Error::ConverterSpawn { .. })
        ));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_scripted_converter() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let dir = std::env::temp_dir().join(format!("palsave_uesave_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        // Stand-in that stores JSON behind the GVAS tag, and fails on request.
        let script = dir.join("uesave");
        fs::write(
            &script,
            "#!/bin/sh\n\
             case \"$1\" in\n\
               to-json) tail -c +5 ;;\n\
               from-json) printf GVAS; cat ;;\n\
               ignore-input) exit 0 ;;\n\
               *) echo \"bad command $1\" >&2; exit 3 ;;\n\
             esac\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let converter = UesaveConverter::new(&script);
        let payload = b"GVAS{\"root\":{\"Guid\":\"abc\"}}";

        let tree = converter.to_tree(payload).unwrap();
        assert_eq!(
            tree.root().field("root").and_then(|n| n.as_guid()),
            Some("abc")
        );
        assert_eq!(converter.from_tree(&tree).unwrap(), payload);

        let err = converter
            .run(&[OsString::from("explode")], b"")
            .unwrap_err();
        match err {
            Error::ConverterFailed { stderr, .. } => assert_eq!(stderr, "bad command explode"),
            other => panic!("unexpected error: {:?}", other),
        }

        // Exits cleanly without draining a payload larger than the pipe buffer.
        let err = converter
            .run(&[OsString::from("ignore-input")], &vec![0u8; 1 << 20])
            .unwrap_err();
        match err {
            Error::ConverterOutput(message) => {
                assert!(message.contains(&script.display().to_string()), "{}", message)
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = converter.to_tree(b"GVAS not json").unwrap_err();
        assert!(matches!(err, Error::ConverterOutput(_)));

        fs::remove_dir_all(&dir).unwrap();
    }
}
