use std::{env, path};

fn get_data_dir() -> Option<path::PathBuf> {
    // first try $BIGCALC_CONFIG_DIR
    if let Some(env_var_dir) = env::var_os("BIGCALC_CONFIG_DIR") {
        return Some(path::PathBuf::from(env_var_dir));
    }
    let project_dirs = directories::ProjectDirs::from("", "", "bigcalc")?;
    Some(project_dirs.data_dir().to_path_buf())
}

pub fn get_history_file_location() -> Option<path::PathBuf> {
    let mut history_path = get_data_dir()?;
    history_path.push("history");
    Some(history_path)
}

#[cfg(test)]
mod tests {
    use super::get_history_file_location;
    use std::{env, path};

    #[test]
    fn env_var_overrides_history_dir() {
        env::set_var("BIGCALC_CONFIG_DIR", "/tmp/bigcalc-test");
        assert_eq!(
            get_history_file_location(),
            Some(path::PathBuf::from("/tmp/bigcalc-test/history"))
        );
    }
}
