#[cfg(feature = "fortran")]
fn main() {
    println!("cargo:rerun-if-env-changed=GLMNET_LIB_DIR");
    if let Ok(dir) = std::env::var("GLMNET_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir);
    }
    println!("cargo:rustc-link-lib=glmnet");
    println!("cargo:rustc-link-lib=gfortran");
}

#[cfg(not(feature = "fortran"))]
fn main() {}
