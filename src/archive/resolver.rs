use crate::archive::{MemberNaming, NamingSchedule, StagingArea};
use crate::error::Result;
use crate::utils::filename::staged_member_name;
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use zip::ZipArchive;

/// The bulletin member extracted for one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMember {
    pub year: i32,
    pub member_name: String,
    pub naming: MemberNaming,
    pub path: PathBuf,
}

pub struct ArchiveMemberResolver {
    schedule: NamingSchedule,
}

impl ArchiveMemberResolver {
    pub fn new(schedule: NamingSchedule) -> Self {
        Self { schedule }
    }

    /// Index of the first member, in archive order, that satisfies the
    /// convention for `year`.
    pub fn find_member<S: AsRef<str>>(&self, year: i32, names: &[S]) -> Option<usize> {
        names.iter().position(|name| {
            let name = name.as_ref();
            !name.ends_with('/') && self.schedule.matches(year, name)
        })
    }

    /// Extract the matching member of `archive_bytes` into the staging area
    /// as `{year}_{file name}`. `Ok(None)` means the archive has no member
    /// for that year.
    pub fn resolve(
        &self,
        year: i32,
        archive_bytes: &[u8],
        staging: &StagingArea,
    ) -> Result<Option<ResolvedMember>> {
        let mut archive = ZipArchive::new(Cursor::new(archive_bytes))?;
        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            names.push(archive.by_index(i)?.name().to_string());
        }
        debug!("Archive for {} contains: {:?}", year, names);

        let index = match self.find_member(year, &names) {
            Some(index) => index,
            None => return Ok(None),
        };

        let mut zip_file = archive.by_index(index)?;
        let member_name = zip_file.name().to_string();
        let dest_path = staging.member_path(&staged_member_name(year, &member_name));
        let mut dest_file = File::create(&dest_path)?;
        let mut writer = BufWriter::new(&mut dest_file);
        std::io::copy(&mut zip_file, &mut writer)?;
        writer.flush()?;

        info!(
            "Extracted {} for {} to {}",
            member_name,
            year,
            dest_path.display()
        );

        Ok(Some(ResolvedMember {
            year,
            member_name,
            naming: self.schedule.naming_for(year),
            path: dest_path,
        }))
    }
}

impl Default for ArchiveMemberResolver {
    fn default() -> Self {
        Self::new(NamingSchedule::default())
    }
}
