use pyo3::prelude::*;
use pyo3::wrap_pymodule;
use splint_core::python::core;

#[pymodule]
#[pyo3(name = "_lib")]
fn splint(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_wrapped(wrap_pymodule!(core))?;

    set_path(m, "splint._lib.core", "core")?;

    Ok(())
}

/// Register a submodule in `sys.modules` so `import splint._lib.core` works
fn set_path(m: &Bound<'_, PyModule>, path: &str, module: &str) -> PyResult<()> {
    let modules = m.py().import("sys")?.getattr("modules")?;
    modules.set_item(path, m.getattr(module)?)
}
