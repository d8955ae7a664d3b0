//! Shared on-disk fixture for the integration tests
//!
//! Three control-table donors: `user-a` (D1, has data), `user-b` (D0, has
//! data) and `user-c` (D1, no data file).

#![allow(dead_code)]

use donor_export::config::{load_config, DonorExportConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SALT: &str = "integration-test-salt";

pub const FIELD_LIST: &str = "\
dataFieldList,include,hashNeeded
time,True,False
type,True,False
value,True,False
units,True,False
deviceId,True,True
uploadId,True,True
id,True,False
bolus,True,False
normal,True,False
carbInput,True,False
duration,True,False
annotations.code,True,False
internalNote,False,False
";

pub const CONTROL_TABLE: &str = "\
dIndex,userID,hashID,D.topTier,D1.qualified.beginDate,D1.qualified.endDate
0,user-a,aaaa1111,D1,2017-01-01,2017-01-31
1,user-b,bbbb2222,D0,,
2,user-c,cccc3333,D1,2017-01-01,2017-01-31
";

pub const DONOR_A: &str = "\
type,time,est.localTime,est.gapSize,est.type,value,units,deviceId,uploadId,id,bolus,normal,carbInput,duration,annotations.code,internalNote
upload,2016-12-01T00:00:00.000Z,,,,,,dexcom-1,up-1,up-1,,,,,,x
cbg,2017-01-02T10:00:00.000Z,2017-01-02T02:00:00,,,5.5,mmol/L,dexcom-1,up-1,c1,,,,,,x
cbg,2017-01-02T10:05:00.000Z,2017-01-02T02:05:00,,,1.0,mmol/L,dexcom-1,up-1,c2,,,,,,x
cbg,2017-01-02T10:10:00.000Z,2017-01-02T02:10:00,,UNCERTAIN,6.1,mmol/L,dexcom-1,up-1,c3,,,,,,x
cbg,2017-02-15T10:00:00.000Z,2017-02-15T02:00:00,,,6.0,mmol/L,dexcom-1,up-1,c4,,,,,,x
bolus,2017-01-03T12:00:00.000Z,2017-01-03T04:00:00,,,,,tandem-1,up-2,b1,,2.5,,,,x
wizard,2017-01-03T11:59:00.000Z,2017-01-03T03:59:00,,,,mmol/L,tandem-1,up-2,w1,b1,,30,,,x
basal,2017-01-04T00:00:00.000Z,2017-01-04T00:00:00,,,,,tandem-1,up-2,ba1,,,,-5,,x
deviceEvent,2017-01-05T00:00:00.000Z,2017-01-05T00:00:00,,,,,tandem-1,up-2,de1,,,,,tandem/pump/alarm,x
";

pub const DONOR_B: &str = "\
type,time,est.localTime,value,deviceId
cbg,2017-01-02T10:00:00.000Z,2017-01-02T02:00:00,5.5,dexcom-2
";

pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    /// Writes the inputs and a config with the given `format`
    pub fn new(format: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        fs::write(root.join("fields.csv"), FIELD_LIST).unwrap();
        fs::write(root.join("control.csv"), CONTROL_TABLE).unwrap();
        fs::create_dir_all(root.join("donors")).unwrap();
        fs::write(root.join("donors").join("PHI-user-a.csv"), DONOR_A).unwrap();
        fs::write(root.join("donors").join("PHI-user-b.csv"), DONOR_B).unwrap();

        let config = format!(
            r#"
[application]
log_level = "debug"

[input]
control_table = "{control}"
donor_csv_dir = "{donors}"
field_list = "{fields}"

[export]
output_dir = "{output}"
format = "{format}"

[anonymization]
salt = "{SALT}"

[anonymization.audit]
enabled = true
log_path = "{audit}"
"#,
            control = toml_path(&root.join("control.csv")),
            donors = toml_path(&root.join("donors")),
            fields = toml_path(&root.join("fields.csv")),
            output = toml_path(&root.join("export")),
            audit = toml_path(&root.join("audit").join("anonymization.log")),
        );
        fs::write(root.join("donor-export.toml"), config).unwrap();

        Self { dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("donor-export.toml")
    }

    pub fn config(&self) -> DonorExportConfig {
        load_config(self.config_path()).unwrap()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("export")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.dir.path().join("audit").join("anonymization.log")
    }
}

fn toml_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}
