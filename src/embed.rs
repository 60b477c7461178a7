//! Invocation API: locating `libjvm`, calling its three exports, and thin
//! forwarders over the `JavaVM` function table.
//!
//! Nothing here manages the VM's lifetime. [`JavaVm`] is a borrowed pointer
//! and is never destroyed implicitly.

use std::ffi::{c_void, CString};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::ptr;

use tracing::debug;

use crate::binder::{Binder, BinderConfig, JNI_INVOCATION_SYMBOLS};
use crate::error::{ArgumentError, Error, Result};
use crate::record::{VmAttachArgs, VmInitArgs, VmOption};
use crate::status::check;
use crate::sys::jni;

fn libjvm_filename() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "jvm.dll"
    }
    #[cfg(target_os = "macos")]
    {
        "libjvm.dylib"
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        "libjvm.so"
    }
}

/// Candidate `libjvm` locations under a JDK or JRE home, most likely first.
pub fn candidates_from_java_home(java_home: &Path) -> Vec<PathBuf> {
    let filename = libjvm_filename();
    let arch = std::env::consts::ARCH;

    let mut rels = vec![
        format!("lib/server/{filename}"),
        format!("jre/lib/server/{filename}"),
        format!("lib/{arch}/server/{filename}"),
        format!("jre/lib/{arch}/server/{filename}"),
    ];

    if cfg!(target_os = "windows") {
        rels.push(format!("bin/server/{filename}"));
        rels.push(format!("jre/bin/server/{filename}"));
        rels.push(format!("bin/client/{filename}"));
        rels.push(format!("jre/bin/client/{filename}"));
    }

    rels.into_iter().map(|r| java_home.join(r)).collect()
}

/// Locate `libjvm` using `JVM_LIB_PATH` or `JAVA_HOME`.
pub fn find_libjvm() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os("JVM_LIB_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
        return Err(Error::Locate(format!(
            "JVM_LIB_PATH is set but does not exist: {}",
            path.display()
        )));
    }

    if let Some(java_home) = std::env::var_os("JAVA_HOME") {
        let java_home = PathBuf::from(java_home);
        return find_in_java_home(&java_home);
    }

    Err(Error::Locate(
        "JAVA_HOME is not set. Set JAVA_HOME or JVM_LIB_PATH to locate libjvm.".to_string(),
    ))
}

/// Locate `libjvm` under a specific home directory.
pub fn find_in_java_home(java_home: &Path) -> Result<PathBuf> {
    candidates_from_java_home(java_home)
        .into_iter()
        .find(|p| p.exists())
        .ok_or_else(|| {
            Error::Locate(format!(
                "Could not find {} under JAVA_HOME={}. Set JVM_LIB_PATH explicitly.",
                libjvm_filename(),
                java_home.display()
            ))
        })
}

/// The three Invocation API exports, bound strictly from one library.
#[derive(Debug)]
pub struct Invocation {
    get_default_init_args: jni::JNI_GetDefaultJavaVMInitArgs,
    create_java_vm: jni::JNI_CreateJavaVM,
    get_created_java_vms: jni::JNI_GetCreatedJavaVMs,
    // Keeps the entry points above mapped.
    binder: Binder,
}

impl Invocation {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut binder = Binder::with_config(JNI_INVOCATION_SYMBOLS, BinderConfig::strict());
        binder.load(path)?;
        Self::from_binder(binder)
    }

    /// Loads the library found by [`find_libjvm`].
    pub fn locate() -> Result<Self> {
        Self::load(find_libjvm()?)
    }

    /// Takes over a binder bound to [`JNI_INVOCATION_SYMBOLS`].
    pub fn from_binder(binder: Binder) -> Result<Self> {
        // SAFETY: the types are the jni.h prototypes of these exports.
        unsafe {
            Ok(Invocation {
                get_default_init_args: binder.function("JNI_GetDefaultJavaVMInitArgs")?,
                create_java_vm: binder.function("JNI_CreateJavaVM")?,
                get_created_java_vms: binder.function("JNI_GetCreatedJavaVMs")?,
                binder,
            })
        }
    }

    pub fn binder(&self) -> &Binder {
        &self.binder
    }

    /// Fills `args` with the VM's defaults for `args.version()`.
    pub fn get_default_init_args(&self, args: &mut VmInitArgs<'_>) -> Result<()> {
        let code = unsafe { (self.get_default_init_args)(args.as_raw_ptr().cast()) };
        check(code, Some("JNI_GetDefaultJavaVMInitArgs"))
    }

    /// Creates a VM. Returns it together with the creating thread's `JNIEnv*`.
    pub fn create_java_vm(&self, args: &mut VmInitArgs<'_>) -> Result<(JavaVm<'_>, *mut jni::JNIEnv)> {
        let mut vm: *mut jni::JavaVM = ptr::null_mut();
        let mut env: *mut jni::JNIEnv = ptr::null_mut();

        let code = unsafe { (self.create_java_vm)(&mut vm, &mut env, args.as_raw_ptr()) };
        check(code, Some("JNI_CreateJavaVM"))?;
        if vm.is_null() || env.is_null() {
            return Err(Error::ForeignCall {
                code: jni::JNI_ERR,
                info: Some("JNI_CreateJavaVM"),
            });
        }
        debug!(target: "jni_cdata::embed", vm = ?vm, version = args.version(), "created java vm");
        // SAFETY: the VM was just created from this library.
        Ok((unsafe { JavaVm::from_raw(vm) }, env))
    }

    /// All VMs created in this process. Each returned handle aliases any
    /// other handle to the same VM.
    pub fn get_created_java_vms(&self) -> Result<Vec<JavaVm<'_>>> {
        let mut count: jni::jsize = 0;
        let code = unsafe { (self.get_created_java_vms)(ptr::null_mut(), 0, &mut count) };
        check(code, Some("JNI_GetCreatedJavaVMs"))?;
        if count <= 0 {
            return Ok(Vec::new());
        }

        let mut vms: Vec<*mut jni::JavaVM> = vec![ptr::null_mut(); count as usize];
        let code = unsafe { (self.get_created_java_vms)(vms.as_mut_ptr(), count, &mut count) };
        check(code, Some("JNI_GetCreatedJavaVMs"))?;
        vms.truncate(count.max(0) as usize);
        // SAFETY: every pointer was produced by this library.
        Ok(vms.into_iter().map(|vm| unsafe { JavaVm::from_raw(vm) }).collect())
    }
}

/// Builder for `JNI_CreateJavaVM` arguments.
#[derive(Debug, Clone)]
pub struct JavaVmBuilder {
    version: jni::jint,
    options: Vec<CString>,
    ignore_unrecognized: bool,
}

impl JavaVmBuilder {
    /// Create a new builder for the given JNI version (e.g. `jni::JNI_VERSION_1_8`).
    pub fn new(version: jni::jint) -> Self {
        Self {
            version,
            options: Vec::new(),
            ignore_unrecognized: false,
        }
    }

    /// Add a JVM option like `-Xmx1g` or `-Dkey=value`.
    pub fn option(mut self, opt: &str) -> Result<Self> {
        self.options.push(option_cstring(opt)?);
        Ok(self)
    }

    /// Add multiple JVM options.
    pub fn options<I, S>(mut self, opts: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for opt in opts {
            self.options.push(option_cstring(opt.as_ref())?);
        }
        Ok(self)
    }

    /// Set whether unrecognized options should be ignored.
    pub fn ignore_unrecognized(mut self, value: bool) -> Self {
        self.ignore_unrecognized = value;
        self
    }

    /// Record views over the stored option strings.
    pub fn vm_options(&self) -> Vec<VmOption<'_>> {
        self.options.iter().map(|s| VmOption::new(s)).collect()
    }

    /// Builds the init args and calls `JNI_CreateJavaVM`.
    pub fn create<'lib>(
        &self,
        invocation: &'lib Invocation,
    ) -> Result<(JavaVm<'lib>, *mut jni::JNIEnv)> {
        let options = self.vm_options();
        let mut args = VmInitArgs::new(self.version, &options, self.ignore_unrecognized)?;
        invocation.create_java_vm(&mut args)
    }
}

fn option_cstring(opt: &str) -> Result<CString> {
    CString::new(opt).map_err(|e| {
        Error::from(ArgumentError::InvalidOption {
            option: opt.to_owned(),
            position: e.nul_position(),
        })
    })
}

/// A `JavaVM*` borrowed from the library that created it.
///
/// Not `Copy`: [`destroy`](JavaVm::destroy) consumes the handle, so the same
/// handle cannot be used after the VM is gone.
///
/// ```compile_fail
/// # use jni_cdata::embed::JavaVm;
/// # use jni_cdata::sys::jni;
/// fn after_destroy(vm: JavaVm<'_>) {
///     let _ = unsafe { vm.destroy() };
///     let _ = vm.get_env(jni::JNI_VERSION_1_8);
/// }
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct JavaVm<'lib> {
    vm: *mut jni::JavaVM,
    _lib: PhantomData<&'lib Invocation>,
}

impl<'lib> JavaVm<'lib> {
    /// # Safety
    ///
    /// `vm` must be a live `JavaVM*` whose library outlives `'lib`.
    pub unsafe fn from_raw(vm: *mut jni::JavaVM) -> Self {
        JavaVm {
            vm,
            _lib: PhantomData,
        }
    }

    /// Return the raw `JavaVM*` pointer.
    pub fn as_raw(&self) -> *mut jni::JavaVM {
        self.vm
    }

    /// Attach the current thread and return its `JNIEnv*`.
    pub fn attach_current_thread(&self, args: Option<&mut VmAttachArgs<'_>>) -> Result<*mut jni::JNIEnv> {
        let mut env: *mut c_void = ptr::null_mut();
        let args: *mut c_void = args.map_or(ptr::null_mut(), |a| a.as_raw_ptr().cast());
        let code = unsafe { crate::jvm_call!(self.vm, AttachCurrentThread, &mut env, args) };
        check(code, Some("AttachCurrentThread"))?;
        Ok(env.cast())
    }

    /// Attach the current thread as a daemon thread.
    pub fn attach_current_thread_as_daemon(
        &self,
        args: Option<&mut VmAttachArgs<'_>>,
    ) -> Result<*mut jni::JNIEnv> {
        let mut env: *mut c_void = ptr::null_mut();
        let args: *mut c_void = args.map_or(ptr::null_mut(), |a| a.as_raw_ptr().cast());
        let code = unsafe { crate::jvm_call!(self.vm, AttachCurrentThreadAsDaemon, &mut env, args) };
        check(code, Some("AttachCurrentThreadAsDaemon"))?;
        Ok(env.cast())
    }

    /// Detach the current thread from the JVM.
    pub fn detach_current_thread(&self) -> Result<()> {
        let code = unsafe { crate::jvm_call!(self.vm, DetachCurrentThread) };
        check(code, Some("DetachCurrentThread"))
    }

    /// The current thread's `JNIEnv*`. A detached thread yields a
    /// `ForeignCall` error with code `JNI_EDETACHED`.
    pub fn get_env(&self, version: jni::jint) -> Result<*mut jni::JNIEnv> {
        let mut env: *mut c_void = ptr::null_mut();
        let code = unsafe { crate::jvm_call!(self.vm, GetEnv, &mut env, version) };
        check(code, Some("GetEnv"))?;
        Ok(env.cast())
    }

    /// Destroy the JVM (explicit shutdown).
    ///
    /// # Safety
    ///
    /// No other `JavaVm` for the same VM, such as one returned by
    /// [`Invocation::get_created_java_vms`] or [`JavaVm::from_raw`], may be
    /// used after this call.
    pub unsafe fn destroy(self) -> Result<()> {
        let code = unsafe { crate::jvm_call!(self.vm, DestroyJavaVM) };
        check(code, Some("DestroyJavaVM"))
    }
}
