//! Dynamic symbol binder.
//!
//! A [`Binder`] opens one shared library and resolves a fixed table of
//! named entry points and variables into address slots:
//!
//! ```text
//! Unloaded ──load──▶ Loading ──ok──▶ Bound ──unload──▶ Unloaded
//!                       │
//!                       └──error──▶ Failed ──load──▶ Loading
//! ```
//!
//! What happens when a symbol is absent is decided by [`BindPolicy`].

use std::ffi::c_void;
use std::marker::PhantomData;
use std::mem;
use std::path::{Path, PathBuf};

use libloading::Library;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

/// Whether a symbol names a function or a data object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Variable,
}

/// One entry of a binder's symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub name: &'static str,
    pub kind: SymbolKind,
}

impl Symbol {
    pub const fn function(name: &'static str) -> Self {
        Symbol {
            name,
            kind: SymbolKind::Function,
        }
    }

    pub const fn variable(name: &'static str) -> Self {
        Symbol {
            name,
            kind: SymbolKind::Variable,
        }
    }
}

/// Invocation API exports of `libjvm`.
pub const JNI_INVOCATION_SYMBOLS: &[Symbol] = &[
    Symbol::function("JNI_GetDefaultJavaVMInitArgs"),
    Symbol::function("JNI_CreateJavaVM"),
    Symbol::function("JNI_GetCreatedJavaVMs"),
];

/// Entry points and variables of the embedding host runtime, bound when
/// the VM side loads the host interpreter library.
pub const HOST_RUNTIME_SYMBOLS: &[Symbol] = &[
    Symbol::variable("Py_Version"),
    Symbol::variable("Py_OptimizeFlag"),
    Symbol::variable("Py_DontWriteBytecodeFlag"),
    Symbol::variable("Py_NoSiteFlag"),
    Symbol::variable("Py_NoUserSiteDirectory"),
    Symbol::function("Py_SetProgramName"),
    Symbol::function("Py_GetProgramName"),
    Symbol::function("Py_SetPythonHome"),
    Symbol::function("Py_GetPythonHome"),
    Symbol::function("Py_Initialize"),
    Symbol::function("Py_IsInitialized"),
    Symbol::function("Py_Finalize"),
    Symbol::function("PySys_SetArgv"),
    Symbol::function("PySys_SetArgvEx"),
    Symbol::function("PySys_SetPath"),
    Symbol::function("Py_GetPrefix"),
    Symbol::function("Py_GetExecPrefix"),
    Symbol::function("Py_GetPath"),
    Symbol::function("PyEval_InitThreads"),
    Symbol::function("PyEval_ThreadsInitialized"),
    Symbol::function("PyEval_SaveThread"),
    Symbol::function("PyEval_RestoreThread"),
    Symbol::function("PyThreadState_Get"),
    Symbol::function("PyThreadState_Swap"),
    Symbol::function("PyEval_AcquireThread"),
    Symbol::function("PyEval_ReleaseThread"),
    Symbol::function("PyEval_AcquireLock"),
    Symbol::function("PyEval_ReleaseLock"),
    Symbol::function("Py_NewInterpreter"),
    Symbol::function("Py_EndInterpreter"),
    Symbol::function("PySys_GetObject"),
    Symbol::function("PyRun_SimpleString"),
    Symbol::function("PyImport_ImportModule"),
    Symbol::function("Py_IncRef"),
    Symbol::function("Py_DecRef"),
    Symbol::function("PyErr_Occurred"),
    Symbol::function("PyErr_GivenExceptionMatches"),
    Symbol::function("PyErr_Clear"),
    Symbol::variable("_Py_NoneStruct"),
    Symbol::variable("_Py_TrueStruct"),
    Symbol::variable("_Py_ZeroStruct"),
];

/// What to do when a table entry is not exported by the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BindPolicy {
    /// Leave a null slot, log a warning and still reach `Bound`.
    #[default]
    BestEffort,
    /// Unload, move to `Failed` and report [`Error::MissingSymbol`].
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BinderConfig {
    pub policy: BindPolicy,
}

impl BinderConfig {
    pub fn strict() -> Self {
        BinderConfig {
            policy: BindPolicy::Strict,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinderState {
    Unloaded,
    Loading,
    Bound,
    Failed,
}

/// A loaded library plus one address slot per table entry.
#[derive(Debug)]
pub struct Binder {
    config: BinderConfig,
    symbols: &'static [Symbol],
    state: BinderState,
    library: Option<Library>,
    path: Option<PathBuf>,
    // Addresses, 0 for an unresolved symbol.
    slots: Vec<usize>,
}

impl Binder {
    pub fn new(symbols: &'static [Symbol]) -> Self {
        Self::with_config(symbols, BinderConfig::default())
    }

    pub fn with_config(symbols: &'static [Symbol], config: BinderConfig) -> Self {
        Binder {
            config,
            symbols,
            state: BinderState::Unloaded,
            library: None,
            path: None,
            slots: Vec::new(),
        }
    }

    pub fn state(&self) -> BinderState {
        self.state
    }

    pub fn config(&self) -> BinderConfig {
        self.config
    }

    pub fn symbols(&self) -> &'static [Symbol] {
        self.symbols
    }

    /// Path of the bound library.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Opens `path` and resolves every symbol in the table.
    ///
    /// A library that is already bound is unloaded first. On failure the
    /// binder is left in `Failed` with no library and no slots.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        if self.library.is_some() {
            self.unload();
        }
        self.state = BinderState::Loading;
        debug!(target: "jni_cdata::binder", path = %path.display(), "loading library");

        let library = match open_library(path) {
            Ok(library) => library,
            Err(err) => {
                self.state = BinderState::Failed;
                debug!(target: "jni_cdata::binder", path = %path.display(), error = %err, "load failed");
                return Err(err);
            }
        };

        let mut slots = Vec::with_capacity(self.symbols.len());
        for symbol in self.symbols {
            let address = resolve(&library, symbol.name);
            match address {
                Some(address) => {
                    trace!(target: "jni_cdata::binder", name = symbol.name, address = ?(address as *const c_void), "bound symbol");
                    slots.push(address);
                }
                None if self.config.policy == BindPolicy::Strict => {
                    drop(library);
                    self.state = BinderState::Failed;
                    debug!(target: "jni_cdata::binder", name = symbol.name, "strict binding failed");
                    return Err(Error::MissingSymbol {
                        name: symbol.name,
                        path: path.display().to_string(),
                    });
                }
                None => {
                    warn!(target: "jni_cdata::binder", name = symbol.name, path = %path.display(), "symbol not found");
                    slots.push(0);
                }
            }
        }

        self.library = Some(library);
        self.path = Some(path.to_path_buf());
        self.slots = slots;
        self.state = BinderState::Bound;
        debug!(target: "jni_cdata::binder", path = %path.display(), missing = self.missing().len(), "library bound");
        Ok(())
    }

    /// Drops the library and clears every slot.
    pub fn unload(&mut self) {
        if let Some(path) = self.path.take() {
            debug!(target: "jni_cdata::binder", path = %path.display(), "unloading library");
        }
        self.library = None;
        self.slots.clear();
        self.state = BinderState::Unloaded;
    }

    fn slot(&self, name: &str) -> Option<usize> {
        if self.state != BinderState::Bound {
            return None;
        }
        let index = self.symbols.iter().position(|s| s.name == name)?;
        self.slots.get(index).copied()
    }

    /// The bound address of `name`. `Some(null)` means the symbol is in
    /// the table but was not exported; `None` means the binder is not
    /// bound or the name is not in the table.
    pub fn address(&self, name: &str) -> Option<*mut c_void> {
        self.slot(name).map(|address| address as *mut c_void)
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.slot(name).is_some_and(|address| address != 0)
    }

    /// Table entries that resolved to a null slot.
    pub fn missing(&self) -> Vec<&'static str> {
        self.symbols
            .iter()
            .zip(&self.slots)
            .filter(|(_, &address)| address == 0)
            .map(|(symbol, _)| symbol.name)
            .collect()
    }

    fn require(&self, name: &str) -> Result<usize> {
        if self.state != BinderState::Bound {
            return Err(Error::NotBound);
        }
        let symbol = self.symbols.iter().find(|s| s.name == name);
        match (symbol, self.slot(name)) {
            (Some(_), Some(address)) if address != 0 => Ok(address),
            (symbol, _) => Err(Error::MissingSymbol {
                name: symbol.map_or("<not in table>", |s| s.name),
                path: self
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            }),
        }
    }

    /// The bound function `name` as the function-pointer type `F`.
    ///
    /// # Safety
    ///
    /// `F` must be the exact foreign signature of the symbol, and the value
    /// must not be called after [`unload`](Self::unload). A `F` that is not
    /// pointer-sized fails to compile:
    ///
    /// ```compile_fail
    /// use jni_cdata::binder::{Binder, JNI_INVOCATION_SYMBOLS};
    ///
    /// let binder = Binder::new(JNI_INVOCATION_SYMBOLS);
    /// let _ = unsafe { binder.function::<u8>("JNI_CreateJavaVM") };
    /// ```
    pub unsafe fn function<F: Copy>(&self, name: &str) -> Result<F> {
        let () = PointerSized::<F>::CHECK;
        let address = self.require(name)? as *mut c_void;
        Ok(mem::transmute_copy::<*mut c_void, F>(&address))
    }

    /// The address of the bound variable `name`.
    ///
    /// # Safety
    ///
    /// `T` must match the variable's type, and the pointer must not be used
    /// after [`unload`](Self::unload).
    pub unsafe fn variable<T>(&self, name: &str) -> Result<*mut T> {
        Ok(self.require(name)? as *mut T)
    }
}

struct PointerSized<F>(PhantomData<F>);

impl<F> PointerSized<F> {
    const CHECK: () = assert!(
        mem::size_of::<F>() == mem::size_of::<*mut c_void>(),
        "function type must be pointer-sized"
    );
}

impl Drop for Binder {
    fn drop(&mut self) {
        if self.library.is_some() {
            self.unload();
        }
    }
}

#[cfg(unix)]
fn open_library(path: &Path) -> Result<Library> {
    use libloading::os::unix;

    // SAFETY: running library initialisers is the point of loading it.
    unsafe { unix::Library::open(Some(path), unix::RTLD_NOW | unix::RTLD_GLOBAL) }
        .map(Library::from)
        .map_err(|e| Error::LibraryLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

#[cfg(not(unix))]
fn open_library(path: &Path) -> Result<Library> {
    // SAFETY: see the unix variant.
    unsafe { Library::new(path) }.map_err(|e| Error::LibraryLoad {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn resolve(library: &Library, name: &str) -> Option<usize> {
    // SAFETY: the symbol is only read as an address, never called here.
    let symbol = unsafe { library.get::<*mut c_void>(name.as_bytes()) }.ok()?;
    let address = *symbol;
    if address.is_null() {
        None
    } else {
        Some(address as usize)
    }
}
